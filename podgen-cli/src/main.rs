//! podgen CLI - packaging metadata generator for Abseil
//!
//! Regenerates `abseil.podspec` from the Bazel build graph and emits the
//! compiler flag tables consumed by the CMake and Bazel builds.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::PodgenConfig;

/// Packaging metadata generator for Abseil.
#[derive(Parser)]
#[command(name = "podgen")]
#[command(author, version)]
#[command(about = "Generate package manifests from the Bazel build graph")]
#[command(after_help = "Examples:
  podgen podspec -V 20240116.0          Write abseil.podspec (tag = version)
  podgen podspec -V 1.0 -t v1.0         Use an explicit git tag
  podgen rules --format json            List eligible cc_library rules
  podgen copts --style cmake --write    Regenerate GENERATED_AbseilCopts.cmake

The podspec version is passed with -V/--version; -v is the global verbose flag.")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the CocoaPods podspec from BUILD.bazel files
    Podspec(podspec::PodspecArgs),

    /// List native rules found in the build graph
    Rules(rules::RulesArgs),

    /// Emit compiler flag tables for CMake or Bazel
    Copts(copts::CoptsArgs),
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .podgen.toml
    let config = PodgenConfig::load(std::path::Path::new("."));

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Podspec(args) => podspec::run(&args, &config),
        Commands::Rules(args) => rules::run(&args, &config),
        Commands::Copts(args) => copts::run(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_podspec_args_parse() {
        let cli = Cli::try_parse_from(["podgen", "podspec", "-V", "1.2.3"]).unwrap();
        match cli.command {
            Some(Commands::Podspec(args)) => {
                assert_eq!(args.version, "1.2.3");
                assert!(args.tag.is_none());
            }
            _ => panic!("expected podspec command"),
        }
    }

    #[test]
    fn test_podspec_long_version_flag() {
        let cli = Cli::try_parse_from(["podgen", "-v", "podspec", "--version", "2.0"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Podspec(args)) => assert_eq!(args.version, "2.0"),
            _ => panic!("expected podspec command"),
        }
    }

    #[test]
    fn test_podspec_requires_version() {
        assert!(Cli::try_parse_from(["podgen", "podspec"]).is_err());
    }

    #[test]
    fn test_copts_output_conflicts_with_write() {
        assert!(Cli::try_parse_from([
            "podgen", "copts", "--style", "cmake", "--write", "--output", "x.cmake"
        ])
        .is_err());
    }
}
