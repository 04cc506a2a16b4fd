//! Command implementations for the podgen CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod copts;
pub mod podspec;
pub mod rules;

use crate::config::PodgenConfig;
use anyhow::{Context, Result};
use clap::Args;
use podgen_core::indexer::LabelMapper;
use podgen_core::query::BazelQuery;
use podgen_core::reader::SourceLayout;
use std::path::PathBuf;

const DEFAULT_QUERY_TOOL: &str = "bazel";

/// Options locating the build graph, shared by commands that query it.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Directory to scan for BUILD packages [default: absl]
    #[arg(long)]
    pub root: Option<String>,

    /// Build-graph query binary [default: bazel]
    #[arg(long = "query-tool", env = "PODGEN_QUERY_TOOL")]
    pub query_tool: Option<String>,
}

impl SourceArgs {
    /// Resolve the source layout: flag > config > default.
    pub fn layout(&self, config: &PodgenConfig) -> SourceLayout {
        let defaults = SourceLayout::default();
        SourceLayout {
            workspace: PathBuf::from("."),
            root: self
                .root
                .clone()
                .or_else(|| config.root().map(str::to_string))
                .unwrap_or(defaults.root),
            build_file: config
                .build_file()
                .map(str::to_string)
                .unwrap_or(defaults.build_file),
        }
    }

    /// Query runner for the resolved tool, run from the working directory.
    pub fn runner(&self, config: &PodgenConfig) -> BazelQuery {
        let tool = self
            .query_tool
            .as_deref()
            .or_else(|| config.query_tool())
            .unwrap_or(DEFAULT_QUERY_TOOL);
        BazelQuery::new(tool, ".")
    }
}

/// Label mapping from config, falling back to the Abseil mapping.
pub fn label_mapper(config: &PodgenConfig) -> Result<LabelMapper> {
    let defaults = LabelMapper::default();
    LabelMapper::new(
        config.prefix().unwrap_or(&defaults.prefix),
        config.namespace().unwrap_or(&defaults.namespace),
    )
    .context("Invalid [namespace] section in .podgen.toml")
}
