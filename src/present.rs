//! Grouping of ranked matches into a display view.
//!
//! Presentation is pure: it never reorders hits within a group, and groups appear
//! in the order their first hit was ranked.

use crate::error::Result;
use crate::index::Entry;
use ahash::AHashMap;
use anyhow::Context;
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A run of hits sharing a label (scope or kind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultGroup<'a> {
    pub label: String,
    pub entries: Vec<&'a Entry>,
    /// Hits for this label cut by the per-group budget
    pub hidden: usize,
}

/// Display model for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultView<'a> {
    pub groups: Vec<ResultGroup<'a>>,
    /// Hits received before any truncation
    pub total: usize,
    /// Hits not shown because of either budget
    pub hidden: usize,
}

impl ResultView<'_> {
    pub fn shown(&self) -> usize {
        self.total - self.hidden
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Groups `entries` by scope label, keeping ranking order within and across groups.
///
/// Entries without a scope are grouped under the empty label.
pub fn present<'a>(entries: &[&'a Entry]) -> Vec<ResultGroup<'a>> {
    group_by(entries, usize::MAX, |entry| entry.scope_label.clone())
}

/// Groups `entries` by [`EntryKind`](crate::index::EntryKind).
pub fn present_by_kind<'a>(entries: &[&'a Entry]) -> Vec<ResultGroup<'a>> {
    group_by(entries, usize::MAX, |entry| entry.kind.as_str().to_string())
}

fn group_by<'a>(
    entries: &[&'a Entry],
    group_budget: usize,
    label_of: impl Fn(&Entry) -> String,
) -> Vec<ResultGroup<'a>> {
    let mut groups: Vec<ResultGroup<'a>> = Vec::new();
    let mut positions: AHashMap<String, usize> = AHashMap::new();

    for &entry in entries {
        let label = label_of(entry);
        let index = *positions.entry(label.clone()).or_insert_with(|| {
            groups.push(ResultGroup {
                label,
                entries: Vec::new(),
                hidden: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[index];
        if group.entries.len() < group_budget {
            group.entries.push(entry);
        } else {
            group.hidden += 1;
        }
    }

    groups
}

/// How a view is grouped.
///
/// DO NOT add doc comments to individual variants - this causes schemars to generate
/// `oneOf` schemas instead of simple `enum` arrays, breaking MCP client enum handling.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    clap::ValueEnum,
    schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    #[default]
    Scope,
    Kind,
}

/// Builds display views under a total and a per-group budget.
#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    budget: usize,
    group_budget: usize,
    grouping: Grouping,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Presenter {
    pub const fn unbounded() -> Self {
        Self {
            budget: usize::MAX,
            group_budget: usize::MAX,
            grouping: Grouping::Scope,
        }
    }

    pub const fn with_budget(budget: usize, group_budget: usize) -> Self {
        Self {
            budget,
            group_budget,
            grouping: Grouping::Scope,
        }
    }

    #[must_use]
    pub const fn grouped_by(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Builds the view for ranked `entries`.
    ///
    /// Only the first `budget` hits are considered; within those, each group keeps at
    /// most `group_budget` hits.
    pub fn present<'a>(&self, entries: &[&'a Entry]) -> ResultView<'a> {
        let considered = &entries[..entries.len().min(self.budget)];
        let groups = match self.grouping {
            Grouping::Scope => group_by(considered, self.group_budget, |entry| {
                entry.scope_label.clone()
            }),
            Grouping::Kind => group_by(considered, self.group_budget, |entry| {
                entry.kind.as_str().to_string()
            }),
        };

        let shown: usize = groups.iter().map(|group| group.entries.len()).sum();
        ResultView {
            groups,
            total: entries.len(),
            hidden: entries.len() - shown,
        }
    }
}

/// Renders a view as indented plain text.
pub fn render_text(view: &ResultView<'_>) -> String {
    let mut output = String::new();

    for group in &view.groups {
        let label = if group.label.is_empty() {
            "(global)"
        } else {
            group.label.as_str()
        };
        let _ = writeln!(output, "{}", label);

        for entry in &group.entries {
            let _ = write!(output, "  {} [{}] {}", entry.display_name, entry.kind, entry.target_ref);
            if !entry.local {
                output.push_str(" (external)");
            }
            output.push('\n');
        }
        if group.hidden > 0 {
            let _ = writeln!(output, "  … {} more", group.hidden);
        }
    }

    if view.hidden > 0 {
        let _ = writeln!(
            output,
            "\nShowing {} of {} results",
            view.shown(),
            view.total
        );
    }

    output
}

/// Renders a view as pretty-printed JSON.
pub fn render_json(view: &ResultView<'_>) -> Result<String> {
    serde_json::to_string_pretty(view).context("Failed to serialize search results")
}
