//! Rule indexer: groups eligible rules into a tree keyed by namespace path.
//!
//! `//absl/strings:str_format` in package `//absl/strings` lands at
//! `abseil -> strings -> str_format`.

use crate::error::{PodgenError, Result};
use crate::types::BuildRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Maps source labels onto manifest namespace paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapper {
    /// Every mapped label must start with this, e.g. `//absl/`.
    pub prefix: String,

    /// Top-level namespace the remainder is re-rooted under, e.g. `abseil`.
    pub namespace: String,
}

impl Default for LabelMapper {
    fn default() -> Self {
        Self {
            prefix: "//absl/".to_string(),
            namespace: "abseil".to_string(),
        }
    }
}

impl LabelMapper {
    /// The namespace becomes a single tree key, so it must be one non-empty
    /// segment without `/`.
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>) -> Result<Self> {
        let mapper = Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
        };
        mapper.validate()?;
        Ok(mapper)
    }

    /// Check the namespace of a mapper built field by field or deserialized.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() || self.namespace.contains('/') {
            return Err(PodgenError::InvalidNamespace {
                namespace: self.namespace.clone(),
            });
        }
        Ok(())
    }

    /// `//absl/strings` -> `abseil/strings`.
    pub fn namespace_path(&self, label: &str) -> Result<String> {
        let rest = label
            .strip_prefix(&self.prefix)
            .ok_or_else(|| PodgenError::LabelOutsidePrefix {
                label: label.to_string(),
                prefix: self.prefix.clone(),
            })?;
        Ok(format!("{}/{}", self.namespace, rest))
    }

    /// `//absl/base:config` -> `abseil/base/config`.
    pub fn dependency_name(&self, label: &str) -> Result<String> {
        self.namespace_path(&label.replace(':', "/"))
    }
}

/// A node of the rule tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleNode {
    Namespace(RuleTree),
    Rule(Box<BuildRule>),
}

/// Nested mapping from path segment to namespace or rule. Keys iterate in
/// lexicographic order at every level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleTree {
    entries: BTreeMap<String, RuleNode>,
}

impl RuleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree from every eligible rule in `rules`.
    ///
    /// Two rules mapping to the same key, or a rule sharing a key with a
    /// namespace, is an error.
    pub fn build<'a>(
        rules: impl IntoIterator<Item = &'a BuildRule>,
        mapper: &LabelMapper,
    ) -> Result<Self> {
        mapper.validate()?;
        let mut tree = Self::new();
        for rule in rules {
            if !rule.is_eligible() {
                debug!("Skipping {} ({})", rule.label(), rule.kind);
                continue;
            }
            let path = mapper.namespace_path(&rule.package)?;
            tree.insert(&path, rule.clone())?;
        }
        Ok(tree)
    }

    /// Insert `rule` under the namespace at `path`, keyed by the rule's name.
    pub fn insert(&mut self, path: &str, rule: BuildRule) -> Result<()> {
        let mut current = self;
        let mut walked: Vec<&str> = Vec::new();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            walked.push(segment);
            let node = current
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| RuleNode::Namespace(RuleTree::new()));
            current = match node {
                RuleNode::Namespace(subtree) => subtree,
                RuleNode::Rule(_) => {
                    return Err(PodgenError::RuleCollision {
                        path: walked.join("/"),
                    })
                }
            };
        }

        if current.entries.contains_key(&rule.name) {
            walked.push(&rule.name);
            return Err(PodgenError::RuleCollision {
                path: walked.join("/"),
            });
        }
        current
            .entries
            .insert(rule.name.clone(), RuleNode::Rule(Box::new(rule)));
        Ok(())
    }

    /// Look up the node at a slash-separated path.
    pub fn get(&self, path: &str) -> Option<&RuleNode> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut node = self.entries.get(first)?;
        for segment in segments {
            match node {
                RuleNode::Namespace(subtree) => node = subtree.entries.get(segment)?,
                RuleNode::Rule(_) => return None,
            }
        }
        Some(node)
    }

    /// The subtree under the top-level namespace, or an empty tree.
    pub fn root_namespace(&self, mapper: &LabelMapper) -> RuleTree {
        match self.entries.get(&mapper.namespace) {
            Some(RuleNode::Namespace(subtree)) => subtree.clone(),
            _ => RuleTree::new(),
        }
    }

    /// Entries in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RuleNode)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rules anywhere below this level.
    pub fn rule_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                RuleNode::Namespace(subtree) => subtree.rule_count(),
                RuleNode::Rule(_) => 1,
            })
            .sum()
    }
}
