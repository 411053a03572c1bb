//! Command-line interface.

use crate::cache::SnapshotCache;
use crate::catalog::Catalog;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::{Entry, StoreStats};
use crate::present::{Grouping, Presenter, render_json, render_text};
use crate::search::MatchMode;
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "doxsearch")]
#[command(about = "Incremental search over documentation search indexes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to doxsearch.toml next to the index)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search an index for a partial name
    Search(SearchArgs),
    /// Show entry counts per category
    Stats {
        /// Search index directory or artifact file
        index: PathBuf,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        no_cache: bool,
    },
    /// Parse every artifact and report the first error
    Check {
        /// Search index directory or artifact file
        index: PathBuf,
    },
    /// Serve the index as an MCP tool over stdio
    Serve {
        /// Search index directory or artifact file
        index: PathBuf,
        #[arg(long)]
        no_cache: bool,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search index directory or artifact file
    pub index: PathBuf,
    /// Partial name as typed by the user
    pub query: String,
    /// Restrict to one category (classes, functions, files, ...)
    #[arg(short, long)]
    pub category: Option<String>,
    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(short, long, value_enum)]
    pub mode: Option<MatchMode>,
    #[arg(short, long, value_enum, default_value_t)]
    pub group_by: Grouping,
    /// Print the result view as JSON
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub no_cache: bool,
}

/// Loads the catalog at `index`, using the snapshot cache unless disabled.
pub fn load_catalog(index: &Path, config: &SearchConfig, no_cache: bool) -> Result<Catalog> {
    let cache = if no_cache {
        None
    } else {
        config.resolved_cache_dir().map(SnapshotCache::new)
    };

    Catalog::load_path(index, cache.as_ref())
        .with_context(|| format!("Failed to load search index from {}", index.display()))
}

/// Runs a search and renders the result view.
pub fn run_search(catalog: &Catalog, config: &SearchConfig, args: &SearchArgs) -> Result<String> {
    let limit = args.limit.unwrap_or(config.max_results);
    let mode = args.mode.unwrap_or(config.match_mode);

    let Some(hits) = catalog.search(&args.query, args.category.as_deref(), mode, limit) else {
        let category = args.category.as_deref().unwrap_or_default();
        let suggestions = catalog.suggest_categories(category);
        if suggestions.is_empty() {
            bail!(
                "Unknown category '{}'. Available: {}",
                category,
                catalog.categories().collect::<Vec<_>>().join(", ")
            );
        }
        bail!(
            "Unknown category '{}'. Did you mean: {}?",
            category,
            suggestions.join(", ")
        );
    };

    let entries: Vec<&Entry> = hits.iter().map(|hit| hit.entry()).collect();
    let presenter = Presenter::with_budget(
        args.limit.unwrap_or(config.display_budget),
        config.group_budget,
    )
    .grouped_by(args.group_by);
    let view = presenter.present(&entries);

    if args.json {
        return render_json(&view);
    }
    if view.is_empty() {
        return Ok(format!("No results found for '{}'\n", args.query));
    }
    Ok(render_text(&view))
}

/// Per-category statistics as text or JSON.
pub fn run_stats(catalog: &Catalog, json: bool) -> Result<String> {
    let stats: BTreeMap<&str, StoreStats> = catalog
        .categories()
        .filter_map(|category| Some((category, catalog.store(category)?.stats())))
        .collect();

    if json {
        return serde_json::to_string_pretty(&stats).context("Failed to serialize statistics");
    }

    let mut output = String::new();
    for (category, stats) in &stats {
        let _ = writeln!(
            output,
            "{}: {} entries, {} keys, {} targets, {} external",
            category,
            stats.entries,
            stats.distinct_keys,
            stats.distinct_targets,
            stats.external_links
        );
        for (kind, count) in &stats.kinds {
            let _ = writeln!(output, "  {:<10} {}", kind.as_str(), count);
        }
    }
    let _ = writeln!(output, "Total: {} entries", catalog.len());
    Ok(output)
}

/// One-line summary of a successfully parsed catalog.
pub fn run_check(catalog: &Catalog) -> String {
    format!(
        "OK: {} categories, {} entries\n",
        catalog.categories().count(),
        catalog.len()
    )
}
