//! Podspec command - regenerate the CocoaPods podspec from the build graph

use super::{label_mapper, SourceArgs};
use crate::config::PodgenConfig;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use podgen_core::pipeline::{self, GeneratorSettings};
use podgen_core::renderer::PodspecTemplate;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct PodspecArgs {
    /// The version of the podspec
    #[arg(short = 'V', long = "version")]
    pub version: String,

    /// The name of the git tag (default: version)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Output file [default: abseil.podspec]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Resolve arguments and config into one immutable settings value.
pub fn settings(args: &PodspecArgs, config: &PodgenConfig) -> Result<GeneratorSettings> {
    let mut settings = GeneratorSettings::new(args.version.clone(), args.tag.clone());
    settings.layout = args.source.layout(config);
    settings.mapper = label_mapper(config)?;

    if let Some(output) = args.output.clone().or_else(|| config.output().map(PathBuf::from)) {
        settings.output = output;
    }
    if let Some(path) = config.template() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read podspec template {}", path))?;
        settings.template = PodspecTemplate::new(text);
    }

    Ok(settings)
}

pub fn run(args: &PodspecArgs, config: &PodgenConfig) -> Result<()> {
    let settings = settings(args, config)?;
    let runner = args.source.runner(config);

    let result = pipeline::generate(&settings, &runner).with_context(|| {
        format!("Failed to generate {}", settings.output.display())
    })?;

    println!(
        "{} Wrote {} ({} subspecs from {} native rules, {}ms)",
        "✓".green(),
        result.output.display().to_string().bold(),
        result.rendered_count,
        result.collected_count,
        result.duration.as_millis()
    );
    Ok(())
}
