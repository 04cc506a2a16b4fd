//! Output formatting for podgen CLI listings
//!
//! Table output uses the `tabled` crate; JSON output is pretty-printed
//! `serde_json`.

use clap::ValueEnum;
use podgen_core::types::BuildRule;
use tabled::{builder::Builder, settings::Style};

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format (default)
    #[default]
    Table,
    /// JSON format for machine consumption
    Json,
}

/// Format rules as a table, one row per rule.
pub fn rules_table(rules: &[BuildRule]) -> String {
    if rules.is_empty() {
        return "(no results)".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Label", "Kind", "Headers", "Sources", "Deps", "Test-only"]);
    for rule in rules {
        builder.push_record([
            rule.label(),
            rule.kind.to_string(),
            rule.headers.len().to_string(),
            rule.sources.len().to_string(),
            rule.dependencies.len().to_string(),
            if rule.test_only { "yes" } else { "" }.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Format rules as a pretty JSON array.
pub fn rules_json(rules: &[BuildRule]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(rules)?)
}
