//! Generation pipeline: read the build graph, index it, render the podspec.

use crate::error::Result;
use crate::indexer::{LabelMapper, RuleTree};
use crate::query::QueryRunner;
use crate::reader::{self, SourceLayout};
use crate::renderer::{self, PodspecMetadata, PodspecTemplate};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Everything one generator run needs. Built once from CLI arguments and
/// configuration, then only read.
#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    pub metadata: PodspecMetadata,
    pub layout: SourceLayout,
    pub mapper: LabelMapper,
    pub template: PodspecTemplate,
    /// Manifest path, relative to the current directory.
    pub output: PathBuf,
}

impl GeneratorSettings {
    /// Abseil defaults for the given version and optional tag.
    pub fn new(version: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            metadata: PodspecMetadata::new(version, tag),
            layout: SourceLayout::default(),
            mapper: LabelMapper::default(),
            template: PodspecTemplate::default(),
            output: PathBuf::from("abseil.podspec"),
        }
    }
}

/// Result of a generator run.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Native rules returned by the query tool.
    pub collected_count: usize,
    /// Rules that made it into the manifest.
    pub rendered_count: usize,
    pub output: PathBuf,
    pub duration: Duration,
}

/// Podspec text plus the counts behind it.
#[derive(Debug, Clone)]
pub struct RenderedPodspec {
    pub text: String,
    pub collected_count: usize,
    pub rendered_count: usize,
}

/// Render the podspec text without writing it.
pub fn render(settings: &GeneratorSettings, runner: &dyn QueryRunner) -> Result<RenderedPodspec> {
    let rules = reader::collect_rules(&settings.layout, runner)?;
    let tree = RuleTree::build(&rules, &settings.mapper)?;
    let text = renderer::render_podspec(
        &tree,
        &settings.mapper,
        &settings.template,
        &settings.metadata,
    )?;
    Ok(RenderedPodspec {
        text,
        collected_count: rules.len(),
        rendered_count: tree.root_namespace(&settings.mapper).rule_count(),
    })
}

/// Run the whole pipeline and write the manifest.
///
/// The manifest is only written after rendering succeeded, so a failed run
/// leaves any previous file untouched.
pub fn generate(settings: &GeneratorSettings, runner: &dyn QueryRunner) -> Result<GenerateResult> {
    let start = Instant::now();
    info!(
        "Generating podspec {} (tag {})",
        settings.metadata.version, settings.metadata.tag
    );

    let rendered = render(settings, runner)?;
    renderer::write_manifest(&settings.output, &rendered.text)?;

    info!(
        "Wrote {} rules to {}",
        rendered.rendered_count,
        settings.output.display()
    );

    Ok(GenerateResult {
        collected_count: rendered.collected_count,
        rendered_count: rendered.rendered_count,
        output: settings.output.clone(),
        duration: start.elapsed(),
    })
}
