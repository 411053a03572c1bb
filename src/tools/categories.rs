//! Handler for the MCP `list_categories` tool.

use crate::catalog::Catalog;
use std::fmt::Write as _;

/// List the categories of the loaded index with entry counts per kind.
pub fn handle_list_categories(catalog: &Catalog) -> String {
    let mut output = format!("Categories ({}):\n", catalog.categories().count());

    for category in catalog.categories() {
        let Some(store) = catalog.store(category) else {
            continue;
        };
        let stats = store.stats();
        let kinds: Vec<String> = stats
            .kinds
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        let _ = writeln!(
            output,
            "  • {} ({} entries: {})",
            category,
            stats.entries,
            kinds.join(", ")
        );
    }

    let _ = writeln!(output, "\nTotal: {} entries", catalog.len());
    output
}
