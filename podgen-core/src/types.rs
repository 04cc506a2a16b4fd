//! Data models for build rules read from the build graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule classes prefixed with this are native C/C++ rules.
pub const NATIVE_RULE_PREFIX: &str = "cc_";

/// The class of a build rule, as reported by the query tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    CcLibrary,
    CcTest,
    CcBinary,
    /// Any other rule class, kept verbatim.
    Other(String),
}

impl RuleKind {
    pub fn from_class(class: &str) -> Self {
        match class {
            "cc_library" => RuleKind::CcLibrary,
            "cc_test" => RuleKind::CcTest,
            "cc_binary" => RuleKind::CcBinary,
            other => RuleKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuleKind::CcLibrary => "cc_library",
            RuleKind::CcTest => "cc_test",
            RuleKind::CcBinary => "cc_binary",
            RuleKind::Other(class) => class,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One compilation unit declared in a BUILD file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRule {
    /// Rule class, from the `class` attribute of the query output.
    pub kind: RuleKind,

    /// Identifier unique within `package`.
    pub name: String,

    /// Package label, e.g. `//absl/strings`.
    pub package: String,

    /// Normalized relative source paths.
    pub sources: Vec<String>,

    /// Normalized relative public header paths.
    pub headers: Vec<String>,

    /// Dependency labels, kept as written (e.g. `//absl/base:config`).
    pub dependencies: Vec<String>,

    /// Visibility labels, e.g. `//visibility:public`.
    pub visibility: Vec<String>,

    /// Set by `testonly = True`; such rules are never rendered.
    pub test_only: bool,
}

impl BuildRule {
    /// Full label of this rule, `package:name`.
    pub fn label(&self) -> String {
        format!("{}:{}", self.package, self.name)
    }

    /// Whether this rule ends up in the generated manifest.
    pub fn is_eligible(&self) -> bool {
        self.kind == RuleKind::CcLibrary && !self.test_only
    }
}
