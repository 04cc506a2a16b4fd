//! Rules command - list the native rules the query tool reports

use super::{label_mapper, SourceArgs};
use crate::config::PodgenConfig;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use podgen_core::reader;
use podgen_core::types::BuildRule;

#[derive(Args, Debug, Clone)]
pub struct RulesArgs {
    /// Include test and non-library rules
    #[arg(short, long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Keep eligible rules unless `all`, sorted by label.
pub fn select(mut rules: Vec<BuildRule>, all: bool) -> Vec<BuildRule> {
    if !all {
        rules.retain(BuildRule::is_eligible);
    }
    rules.sort_by_key(|r| r.label());
    rules
}

pub fn run(args: &RulesArgs, config: &PodgenConfig) -> Result<()> {
    let layout = args.source.layout(config);
    let runner = args.source.runner(config);

    let rules = reader::collect_rules(&layout, &runner)
        .with_context(|| format!("Failed to read build graph under {}", layout.root))?;
    let rules = select(rules, args.all);

    // Surface labels the manifest could not map, without failing the listing.
    let mapper = label_mapper(config)?;
    for rule in rules.iter().filter(|r| r.is_eligible()) {
        if let Err(e) = mapper.namespace_path(&rule.package) {
            tracing::warn!("{}", e);
        }
    }

    match args.format {
        OutputFormat::Table => println!("{}", output::rules_table(&rules)),
        OutputFormat::Json => println!("{}", output::rules_json(&rules)?),
    }
    Ok(())
}
