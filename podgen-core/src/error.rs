//! Error types for podgen-core.

use thiserror::Error;

/// Result type alias for podgen-core operations.
pub type Result<T> = std::result::Result<T, PodgenError>;

/// Errors that can occur while reading the build graph or rendering output.
///
/// Every variant is fatal for a run; nothing is retried.
#[derive(Error, Debug)]
pub enum PodgenError {
    /// The query tool could not be started at all.
    #[error("Failed to run '{program}': {source}")]
    QuerySpawn {
        /// Program that was invoked.
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The query tool ran but exited unsuccessfully.
    #[error("Query for {package} failed ({status}): {stderr}")]
    QueryFailed {
        /// Package label that was queried.
        package: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error of the tool.
        stderr: String,
    },

    /// Query output was not valid UTF-8.
    #[error("Query output for {package} is not valid UTF-8")]
    InvalidOutput {
        /// Package label that was queried.
        package: String,
    },

    /// Query output was not well-formed XML.
    #[error("Malformed XML in query output: {message}")]
    Xml {
        /// Description of the XML error.
        message: String,
    },

    /// A requested rule attribute used a tag we do not decode.
    #[error("Cannot recognize tag '{tag}' for attribute '{attribute}'")]
    UnrecognizedTag {
        /// Element tag name.
        tag: String,
        /// Value of the element's `name` attribute.
        attribute: String,
    },

    /// A rule was missing an attribute required to identify it.
    #[error("Rule in {package} is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Package the rule was declared in.
        package: String,
        /// Name of the missing attribute.
        attribute: String,
    },

    /// A label does not live under the expected source prefix.
    #[error("{label} doesn't start with {prefix}")]
    LabelOutsidePrefix {
        /// Offending label.
        label: String,
        /// Required prefix.
        prefix: String,
    },

    /// Two entries map to the same key in the rule tree.
    #[error("Rule tree collision at '{path}'")]
    RuleCollision {
        /// Slash-separated path of the colliding key.
        path: String,
    },

    /// The podspec template referenced a variable that was not supplied.
    #[error("Unknown template variable: ${{{name}}}")]
    UnknownTemplateVariable {
        /// Placeholder name.
        name: String,
    },

    /// The top-level namespace is empty or spans several path segments.
    #[error("Invalid namespace {namespace:?}: must be one non-empty segment without '/'")]
    InvalidNamespace {
        /// Namespace as configured.
        namespace: String,
    },

    /// The directory to scan does not exist.
    #[error("Root directory not found: {path}")]
    RootNotFound {
        /// Path that was searched.
        path: String,
    },

    /// IO error while walking directories or writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for PodgenError {
    fn from(err: quick_xml::Error) -> Self {
        PodgenError::Xml {
            message: err.to_string(),
        }
    }
}
