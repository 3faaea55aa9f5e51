//! Regenerates `.clinerules` and `.roomodes` for the current directory.
//!
//! Takes no options: inputs are read from `./.cline/rules/` (required) and
//! `./.cline/roomodes/` (optional). Diagnostics go to stderr, the one-line
//! summary to stdout. Exits 1 on any fatal error.

use anyhow::{Context, Result, bail};
use clinerules_build::logging::init_logging;
use clinerules_build::{BuildConfig, BuildLayout, run_build};
use std::env;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    if parse_args()? {
        print!("{}", usage());
        return Ok(());
    }

    let config = BuildConfig::from_env()?;
    init_logging(&config.log_filter)?;

    let cwd = env::current_dir().context("resolving working directory")?;
    let layout = BuildLayout::from_root(cwd);
    let summary = run_build(&layout, &config)?;
    println!("{summary}");
    Ok(())
}

/// Returns true when help was requested.
fn parse_args() -> Result<bool> {
    let mut args = env::args_os().skip(1);
    let Some(first) = args.next() else {
        return Ok(false);
    };
    match first.to_str() {
        Some("-h") | Some("--help") if args.next().is_none() => Ok(true),
        _ => bail!(usage()),
    }
}

fn usage() -> &'static str {
    "Usage: build-clinerules\n\nReads .cline/rules/**/*.md and .cline/roomodes/* under the current directory\nand writes .clinerules and .roomodes next to them.\n\nEnvironment:\n  CLINERULES_LOG          log filter (default: info)\n  CLINERULES_RULE_PATHS   flat (default) or nested\n"
}
