//! Graph reader: finds BUILD packages under a source root and turns the
//! query tool's XML into [`BuildRule`] records.

use crate::error::{PodgenError, Result};
use crate::query::QueryRunner;
use crate::types::{BuildRule, RuleKind, NATIVE_RULE_PREFIX};
use crate::xml::{self, AttributeValue, Element};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where to look for BUILD packages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLayout {
    /// Directory the query tool runs in; package labels are relative to it.
    pub workspace: PathBuf,

    /// Subdirectory of `workspace` to scan, e.g. `absl`.
    pub root: String,

    /// File name marking a package directory.
    pub build_file: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("."),
            root: "absl".to_string(),
            build_file: "BUILD.bazel".to_string(),
        }
    }
}

/// Turn a label-ish path into a plain relative file path.
///
/// `//absl/base:internal/atomic_hook.h` becomes `absl/base/internal/atomic_hook.h`.
/// Already-normalized paths are returned unchanged.
pub fn normalize_path(path: &str) -> String {
    path.trim_start_matches('/').replace(':', "/")
}

/// List package labels (`//absl/base`, ...) for every directory under the
/// layout root holding a build file, in path order.
pub fn find_packages(layout: &SourceLayout) -> Result<Vec<String>> {
    let root_dir = layout.workspace.join(&layout.root);
    if !root_dir.is_dir() {
        return Err(PodgenError::RootNotFound {
            path: root_dir.to_string_lossy().to_string(),
        });
    }

    // Plain recursive walk: hidden and gitignored directories are packages too.
    let walker = WalkBuilder::new(&root_dir)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut packages = Vec::new();
    for entry in walker {
        // Unreadable directories are skipped, the rest of the tree still counts.
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path under {}: {}", root_dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }
        if entry.path().join(&layout.build_file).is_file() {
            packages.push(package_label(&layout.workspace, entry.path()));
        }
    }

    Ok(packages)
}

fn package_label(workspace: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(workspace).unwrap_or(dir);
    let segments: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    format!("//{}", segments.join("/"))
}

/// Query every package under the layout root and collect their native rules.
pub fn collect_rules(layout: &SourceLayout, runner: &dyn QueryRunner) -> Result<Vec<BuildRule>> {
    let packages = find_packages(layout)?;
    info!("Found {} packages under {}", packages.len(), layout.root);

    let mut rules = Vec::new();
    for package in &packages {
        let output = runner.query_package(package)?;
        let parsed = parse_query_output(&output, package)?;
        debug!("{}: {} native rules", package, parsed.len());
        rules.extend(parsed);
    }

    info!("Collected {} native rules", rules.len());
    Ok(rules)
}

/// Parse one package's query output, keeping `cc_*` rules only.
pub fn parse_query_output(output: &str, package: &str) -> Result<Vec<BuildRule>> {
    let root = xml::parse_document(output)?;
    root.children
        .iter()
        .filter(|elem| {
            elem.tag == "rule"
                && elem
                    .attr("class")
                    .is_some_and(|class| class.starts_with(NATIVE_RULE_PREFIX))
        })
        .map(|elem| parse_rule(elem, package))
        .collect()
}

fn parse_rule(elem: &Element, package: &str) -> Result<BuildRule> {
    let list = |field: &str| -> Result<Vec<String>> {
        Ok(elem
            .field(field)?
            .and_then(AttributeValue::into_list)
            .unwrap_or_default())
    };

    let name = elem
        .field("name")?
        .and_then(AttributeValue::into_string)
        .ok_or_else(|| PodgenError::MissingAttribute {
            package: package.to_string(),
            attribute: "name".to_string(),
        })?;

    Ok(BuildRule {
        kind: RuleKind::from_class(elem.attr("class").unwrap_or_default()),
        name,
        package: package.to_string(),
        sources: list("srcs")?.iter().map(|p| normalize_path(p)).collect(),
        headers: list("hdrs")?.iter().map(|p| normalize_path(p)).collect(),
        dependencies: list("deps")?,
        visibility: list("visibility")?,
        test_only: elem
            .field("testonly")?
            .and_then(AttributeValue::into_bool)
            .unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Serves canned XML and records which packages were asked for.
    struct FakeQuery {
        responses: HashMap<String, String>,
        seen: RefCell<Vec<String>>,
    }

    impl QueryRunner for FakeQuery {
        fn query_package(&self, package: &str) -> Result<String> {
            self.seen.borrow_mut().push(package.to_string());
            Ok(self
                .responses
                .get(package)
                .cloned()
                .unwrap_or_else(|| "<query version=\"2\"/>".to_string()))
        }
    }

    const BASE_XML: &str = r#"<?xml version="1.1" encoding="UTF-8" standalone="no"?>
<query version="2">
    <rule class="cc_library" name="//absl/base:config">
        <string name="name" value="config"/>
        <list name="hdrs">
            <label value="//absl/base:config.h"/>
            <label value="//absl/base:policy_checks.h"/>
        </list>
        <list name="srcs"/>
        <list name="deps">
            <label value="//absl/base:core_headers"/>
        </list>
        <list name="visibility">
            <label value="//visibility:public"/>
        </list>
    </rule>
    <rule class="cc_test" name="//absl/base:config_test">
        <string name="name" value="config_test"/>
        <list name="srcs">
            <label value="//absl/base:config_test.cc"/>
        </list>
        <boolean name="testonly" value="true"/>
    </rule>
    <rule class="config_setting" name="//absl/base:msvc">
        <string name="name" value="msvc"/>
    </rule>
    <source-file name="//absl/base:config.h"/>
</query>
"#;

    fn create_source_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        for pkg in ["absl/base", "absl/strings", "absl/strings/internal", "absl/.hidden"] {
            fs::create_dir_all(dir.path().join(pkg)).unwrap();
            fs::write(dir.path().join(pkg).join("BUILD.bazel"), "").unwrap();
        }
        // A directory without a build file is not a package.
        fs::create_dir_all(dir.path().join("absl/testdata")).unwrap();
        fs::write(dir.path().join("absl/testdata/data.txt"), "x").unwrap();
        dir
    }

    fn layout(dir: &TempDir) -> SourceLayout {
        SourceLayout {
            workspace: dir.path().to_path_buf(),
            ..SourceLayout::default()
        }
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("//absl/base:config.h"), "absl/base/config.h");
        assert_eq!(
            normalize_path("//absl/base:internal/atomic_hook.h"),
            "absl/base/internal/atomic_hook.h"
        );
        assert_eq!(normalize_path("absl/base/config.h"), "absl/base/config.h");
    }

    #[test]
    fn test_normalize_path_is_idempotent() {
        for path in ["//absl/a:b.cc", "/x:y:z", "plain/file.h", ""] {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once);
        }
    }

    #[test]
    fn test_parse_query_output_keeps_native_rules() {
        let rules = parse_query_output(BASE_XML, "//absl/base").unwrap();
        assert_eq!(rules.len(), 2);

        let config = &rules[0];
        assert_eq!(config.kind, RuleKind::CcLibrary);
        assert_eq!(config.name, "config");
        assert_eq!(config.package, "//absl/base");
        assert_eq!(
            config.headers,
            vec!["absl/base/config.h", "absl/base/policy_checks.h"]
        );
        assert!(config.sources.is_empty());
        assert_eq!(config.dependencies, vec!["//absl/base:core_headers"]);
        assert_eq!(config.visibility, vec!["//visibility:public"]);
        assert!(!config.test_only);

        let test = &rules[1];
        assert_eq!(test.kind, RuleKind::CcTest);
        assert!(test.test_only);
        assert_eq!(test.sources, vec!["absl/base/config_test.cc"]);
    }

    #[test]
    fn test_rule_without_name_is_fatal() {
        let xml = r#"<query><rule class="cc_library"><list name="srcs"/></rule></query>"#;
        let err = parse_query_output(xml, "//absl/base").unwrap_err();
        assert!(matches!(err, PodgenError::MissingAttribute { .. }));
    }

    #[test]
    fn test_unrecognized_tag_on_requested_field() {
        let xml = r#"<query><rule class="cc_library">
            <string name="name" value="x"/>
            <dict name="srcs"/>
        </rule></query>"#;
        assert!(matches!(
            parse_query_output(xml, "//absl/base"),
            Err(PodgenError::UnrecognizedTag { .. })
        ));
    }

    #[test]
    fn test_find_packages() {
        let dir = create_source_tree();
        let packages = find_packages(&layout(&dir)).unwrap();
        assert_eq!(
            packages,
            vec![
                "//absl/.hidden",
                "//absl/base",
                "//absl/strings",
                "//absl/strings/internal",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_find_packages_skips_unreadable_directories() {
        use std::os::unix::fs::PermissionsExt;

        let dir = create_source_tree();
        let locked = dir.path().join("absl/locked");
        fs::create_dir_all(locked.join("inner")).unwrap();
        fs::write(locked.join("inner/BUILD.bazel"), "").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = find_packages(&layout(&dir));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Superusers can still read the directory; either way the walk succeeds.
        let packages = result.unwrap();
        assert!(packages.contains(&"//absl/base".to_string()));
        assert!(packages.contains(&"//absl/strings/internal".to_string()));
    }

    #[test]
    fn test_find_packages_missing_root() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            find_packages(&layout(&dir)),
            Err(PodgenError::RootNotFound { .. })
        ));
    }

    #[test]
    fn test_collect_rules_queries_every_package() {
        let dir = create_source_tree();
        let fake = FakeQuery {
            responses: HashMap::from([("//absl/base".to_string(), BASE_XML.to_string())]),
            seen: RefCell::new(Vec::new()),
        };

        let rules = collect_rules(&layout(&dir), &fake).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(fake.seen.borrow().len(), 4);
    }

    #[test]
    fn test_collect_rules_propagates_query_failure() {
        struct Failing;
        impl QueryRunner for Failing {
            fn query_package(&self, package: &str) -> Result<String> {
                Err(PodgenError::QueryFailed {
                    package: package.to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: String::new(),
                })
            }
        }

        let dir = create_source_tree();
        assert!(collect_rules(&layout(&dir), &Failing).is_err());
    }
}
