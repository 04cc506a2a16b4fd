//! Podspec renderer.
//!
//! Emits the header template followed by one nested `subspec` block per tree
//! key. Block variables encode depth (`s`, `s1`, `s2`, ...) since each Ruby
//! block introduces its own spec variable.

use crate::error::{PodgenError, Result};
use crate::indexer::{LabelMapper, RuleNode, RuleTree};
use crate::types::BuildRule;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Podspec header for Abseil. `${version}` and `${tag}` are substituted.
pub const ABSEIL_TEMPLATE: &str = "Pod::Spec.new do |s|
  s.name     = 'abseil'
  s.version  = '${version}'
  s.summary  = 'Abseil Common Libraries (C++) from Google'
  s.homepage = 'https://abseil.io'
  s.license  = 'Apache License, Version 2.0'
  s.authors  = { 'Abseil' => 'abseil-io@googlegroups.com' }
  s.source = {
    :git => 'https://github.com/abseil/abseil-cpp.git',
    :tag => '${tag}',
  }
  s.ios.deployment_target = '7.0'
  s.osx.deployment_target = '10.9'
  s.tvos.deployment_target = '10.0'
  s.watchos.deployment_target = '4.0'
";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\w+)\}").expect("placeholder pattern is valid"));

/// Values substituted into the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodspecMetadata {
    pub version: String,
    pub tag: String,
}

impl PodspecMetadata {
    /// Tag falls back to the version when not given.
    pub fn new(version: impl Into<String>, tag: Option<String>) -> Self {
        let version = version.into();
        let tag = tag.unwrap_or_else(|| version.clone());
        Self { version, tag }
    }

    fn variables(&self) -> HashMap<&'static str, &str> {
        HashMap::from([("version", self.version.as_str()), ("tag", self.tag.as_str())])
    }
}

/// Header text with `${name}` placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodspecTemplate {
    text: String,
}

impl Default for PodspecTemplate {
    fn default() -> Self {
        Self::new(ABSEIL_TEMPLATE)
    }
}

impl PodspecTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Replace every `${name}` with its value. Unknown names are an error.
    pub fn substitute(&self, vars: &HashMap<&str, &str>) -> Result<String> {
        let mut out = String::with_capacity(self.text.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(&self.text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = vars.get(name.as_str()).ok_or_else(|| {
                PodspecTemplate::unknown(name.as_str())
            })?;
            out.push_str(&self.text[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }

        out.push_str(&self.text[last..]);
        Ok(out)
    }

    fn unknown(name: &str) -> PodgenError {
        PodgenError::UnknownTemplateVariable {
            name: name.to_string(),
        }
    }
}

/// Spec variable for a block depth.
fn spec_var(depth: usize) -> String {
    if depth == 0 {
        "s".to_string()
    } else {
        format!("s{}", depth)
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth + 1)
}

/// Render a complete podspec for `tree`.
///
/// Only the subtree under the mapper's namespace is emitted, since the
/// top-level spec already stands for that namespace.
pub fn render_podspec(
    tree: &RuleTree,
    mapper: &LabelMapper,
    template: &PodspecTemplate,
    metadata: &PodspecMetadata,
) -> Result<String> {
    let mut out = template.substitute(&metadata.variables())?;
    write_tree(&mut out, &tree.root_namespace(mapper), 0, mapper)?;
    out.push_str("end\n");
    Ok(out)
}

fn write_tree(out: &mut String, tree: &RuleTree, depth: usize, mapper: &LabelMapper) -> Result<()> {
    let pad = indent(depth);
    for (key, node) in tree.iter() {
        out.push_str(&format!(
            "{}{}.subspec '{}' do |{}|\n",
            pad,
            spec_var(depth),
            key,
            spec_var(depth + 1)
        ));
        match node {
            RuleNode::Namespace(subtree) => write_tree(out, subtree, depth + 1, mapper)?,
            RuleNode::Rule(rule) => write_rule(out, rule, depth + 1, mapper)?,
        }
        out.push_str(&format!("{}end\n", pad));
    }
    Ok(())
}

fn write_rule(out: &mut String, rule: &BuildRule, depth: usize, mapper: &LabelMapper) -> Result<()> {
    let pad = indent(depth);
    let var = spec_var(depth);

    if !rule.headers.is_empty() {
        let leading = format!("{}{}.public_header_files = ", pad, var);
        write_list(out, &leading, &sorted(&rule.headers));
    }
    if !rule.sources.is_empty() {
        let leading = format!("{}{}.source_files = ", pad, var);
        write_list(out, &leading, &sorted(&rule.sources));
    }

    let mut deps = sorted(&rule.dependencies);
    deps.dedup();
    for dep in deps {
        let name = mapper.dependency_name(&dep)?;
        out.push_str(&format!("{}{}.dependency '{}'\n", pad, var, name));
    }
    Ok(())
}

/// First value follows `leading`; the rest are aligned under it.
fn write_list(out: &mut String, leading: &str, values: &[String]) {
    let continuation = " ".repeat(leading.len());
    for (i, value) in values.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{}'{}'", leading, value));
        } else {
            out.push_str(&format!(",\n{}'{}'", continuation, value));
        }
    }
    out.push('\n');
}

fn sorted(values: &[String]) -> Vec<String> {
    let mut values = values.to_vec();
    values.sort();
    values
}

/// Write the rendered manifest, replacing any existing file.
pub fn write_manifest(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text)?;
    Ok(())
}
