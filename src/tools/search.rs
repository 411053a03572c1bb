//! Prefix search handler for the MCP `search` tool.

use crate::catalog::{Catalog, CatalogHit};
use crate::config::SearchConfig;
use crate::index::Entry;
use crate::present::{Grouping, Presenter, render_text};
use crate::search::MatchMode;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Partial symbol name, matched case-insensitively against the start of each name
    pub query: String,
    /// Category to search within (classes, functions, files, ...); all when omitted
    pub category: Option<String>,
    /// Maximum number of results to return (default: from configuration)
    pub limit: Option<usize>,
    /// `prefix` (default) or `substring` to also match names containing the query
    pub mode: Option<MatchMode>,
    /// Group results by `scope` or `kind` instead of a ranked list
    pub group_by: Option<Grouping>,
}

/// Execute a search against the loaded catalog.
pub fn handle_search(
    catalog: &Catalog,
    config: &SearchConfig,
    request: &SearchRequest,
) -> Result<String, String> {
    let limit = request.limit.unwrap_or(config.max_results);
    let mode = request.mode.unwrap_or(config.match_mode);

    let Some(hits) = catalog.search(&request.query, request.category.as_deref(), mode, limit)
    else {
        return Err(unknown_category(
            catalog,
            request.category.as_deref().unwrap_or_default(),
        ));
    };

    if hits.is_empty() {
        let mut msg = format!("No results found for '{}'.\n\n", request.query);
        msg.push_str("Search tips:\n");
        msg.push_str("• Names match from their first character: 'Obj' finds 'ObjectPool'\n");
        msg.push_str("• Use mode 'substring' to match inside names\n");
        if request.query.contains("::") || request.query.contains('.') {
            msg.push_str("• Search by symbol name only, not the qualified path\n");
        }
        return Ok(msg);
    }

    let output = match request.group_by {
        Some(grouping) => {
            let entries: Vec<&Entry> = hits.iter().map(CatalogHit::entry).collect();
            let view = Presenter::with_budget(limit, config.group_budget)
                .grouped_by(grouping)
                .present(&entries);
            render_text(&view)
        }
        None => format_ranked(&hits),
    };

    Ok(format!(
        "Search results for '{}':\n\n{}",
        request.query, output
    ))
}

/// Format hits as a numbered list with relevance.
fn format_ranked(hits: &[CatalogHit<'_>]) -> String {
    let mut output = String::new();

    for (idx, hit) in hits.iter().enumerate() {
        let entry = hit.entry();
        let _ = writeln!(
            output,
            "{}. `{}` ({}, {}) - relevance: {}",
            idx + 1,
            entry.qualified_name(),
            entry.kind,
            hit.category,
            hit.hit.relevance
        );
        let _ = write!(output, "   {}", entry.target_ref);
        if !entry.local {
            output.push_str(" (external)");
        }
        output.push('\n');
    }

    output
}

fn unknown_category(catalog: &Catalog, category: &str) -> String {
    let suggestions = catalog.suggest_categories(category);
    let mut msg = format!("Category '{}' not found.", category);

    if suggestions.is_empty() {
        let available: Vec<&str> = catalog.categories().collect();
        let _ = write!(msg, " Available categories: {}", available.join(", "));
    } else {
        msg.push_str(" Did you mean one of these?\n\n");
        for suggestion in suggestions.into_iter().take(5) {
            let _ = writeln!(msg, "• `{}`", suggestion);
        }
    }

    msg
}
