//! podgen core - build-graph extraction and podspec rendering.
//!
//! Turns the Bazel build graph of a C++ library into a CocoaPods podspec:
//!
//! 1. [`reader`] walks the source tree, runs the query tool per package
//!    and parses its XML into [`types::BuildRule`]s.
//! 2. [`indexer`] keeps `cc_library` rules that are not test-only and nests
//!    them by namespace path.
//! 3. [`renderer`] emits the podspec, one `subspec` block per tree key.
//!
//! [`copts`] holds the compiler flag tables consumed by the CMake and Bazel
//! build files.
//!
//! # Usage
//!
//! ```no_run
//! use podgen_core::pipeline::{generate, GeneratorSettings};
//! use podgen_core::query::BazelQuery;
//!
//! let settings = GeneratorSettings::new("20240116.0", None);
//! let runner = BazelQuery::new("bazel", ".");
//! let result = generate(&settings, &runner)?;
//! println!("{} rules", result.rendered_count);
//! # Ok::<(), podgen_core::PodgenError>(())
//! ```

pub mod copts;
pub mod error;
pub mod indexer;
pub mod pipeline;
pub mod query;
pub mod reader;
pub mod renderer;
pub mod types;
pub mod xml;

pub use error::{PodgenError, Result};
