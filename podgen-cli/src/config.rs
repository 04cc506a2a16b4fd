//! podgen configuration loading from `.podgen.toml`.
//!
//! Configuration is optional; every value has an Abseil default and every
//! value can be overridden from the command line.
//!
//! # Example Configuration
//!
//! ```toml
//! [query]
//! tool = "bazelisk"
//!
//! [layout]
//! root = "absl"
//! build_file = "BUILD.bazel"
//! output = "abseil.podspec"
//! template = "tools/abseil.podspec.in"
//!
//! [namespace]
//! prefix = "//absl/"
//! name = "abseil"
//! ```

use serde::Deserialize;
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = ".podgen.toml";

/// Root configuration structure loaded from `.podgen.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct PodgenConfig {
    #[serde(default)]
    pub query: QueryConfig,

    /// Where BUILD packages live and where output goes.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Label prefix and manifest namespace.
    #[serde(default)]
    pub namespace: NamespaceConfig,
}

/// Build-graph query tool settings.
#[derive(Debug, Deserialize, Default)]
pub struct QueryConfig {
    /// Query binary, e.g. `bazel` or `bazelisk`.
    #[serde(default)]
    pub tool: Option<String>,
}

/// Source tree and output layout.
#[derive(Debug, Deserialize, Default)]
pub struct LayoutConfig {
    /// Directory scanned for packages, relative to the working directory.
    #[serde(default)]
    pub root: Option<String>,

    /// File name marking a package directory.
    #[serde(default)]
    pub build_file: Option<String>,

    /// Podspec output path.
    #[serde(default)]
    pub output: Option<String>,

    /// Replacement header template with `${version}` / `${tag}` placeholders.
    #[serde(default)]
    pub template: Option<String>,
}

/// Label-to-namespace mapping.
#[derive(Debug, Deserialize, Default)]
pub struct NamespaceConfig {
    /// Required label prefix, e.g. `//absl/`.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Top-level manifest namespace, e.g. `abseil`.
    #[serde(default)]
    pub name: Option<String>,
}

impl PodgenConfig {
    /// Load configuration from `.podgen.toml` in the given directory.
    ///
    /// A missing file gives defaults. Read and parse errors are logged as
    /// warnings and also give defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    pub fn query_tool(&self) -> Option<&str> {
        self.query.tool.as_deref()
    }

    pub fn root(&self) -> Option<&str> {
        self.layout.root.as_deref()
    }

    pub fn build_file(&self) -> Option<&str> {
        self.layout.build_file.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.layout.output.as_deref()
    }

    pub fn template(&self) -> Option<&str> {
        self.layout.template.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.namespace.prefix.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = PodgenConfig::load(dir.path());
        assert!(config.query_tool().is_none());
        assert!(config.root().is_none());
        assert!(config.namespace().is_none());
    }

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[query]
tool = "bazelisk"

[layout]
root = "src/absl"
build_file = "BUILD"
output = "out/abseil.podspec"

[namespace]
prefix = "//src/absl/"
name = "absl"
"#,
        )
        .unwrap();

        let config = PodgenConfig::load(dir.path());
        assert_eq!(config.query_tool(), Some("bazelisk"));
        assert_eq!(config.root(), Some("src/absl"));
        assert_eq!(config.build_file(), Some("BUILD"));
        assert_eq!(config.output(), Some("out/abseil.podspec"));
        assert_eq!(config.template(), None);
        assert_eq!(config.prefix(), Some("//src/absl/"));
        assert_eq!(config.namespace(), Some("absl"));
    }

    #[test]
    fn test_partial_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[query]\ntool = \"bazelisk\"\n").unwrap();

        let config = PodgenConfig::load(dir.path());
        assert_eq!(config.query_tool(), Some("bazelisk"));
        assert!(config.output().is_none());
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[query\ntool = ").unwrap();

        let config = PodgenConfig::load(dir.path());
        assert!(config.query_tool().is_none());
    }
}
