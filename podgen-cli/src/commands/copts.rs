//! Copts command - emit the compiler flag tables for CMake or Bazel

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use podgen_core::copts::{render_copts, CoptStyle};
use std::path::PathBuf;

/// Generated file flavour
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Style {
    /// `list(APPEND ...)` blocks for CMake
    Cmake,
    /// Starlark list assignments for Bazel
    Bazel,
}

impl From<Style> for CoptStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Cmake => CoptStyle::Cmake,
            Style::Bazel => CoptStyle::Bazel,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CoptsArgs {
    /// Target build system
    #[arg(short, long, value_enum)]
    pub style: Style,

    /// Write to this file instead of stdout
    #[arg(short, long, conflicts_with = "write")]
    pub output: Option<PathBuf>,

    /// Write to the conventional generated file name in the current directory
    #[arg(short, long)]
    pub write: bool,
}

pub fn run(args: &CoptsArgs) -> Result<()> {
    let style = CoptStyle::from(args.style);
    let text = render_copts(style);

    let target = if args.write {
        Some(PathBuf::from(style.default_file_name()))
    } else {
        args.output.clone()
    };

    match target {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Wrote {}", "✓".green(), path.display().to_string().bold());
        }
        None => print!("{}", text),
    }
    Ok(())
}
