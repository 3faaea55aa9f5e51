//! Diagnostic output for the build binary.
//!
//! Diagnostics go to stderr so stdout carries only the run summary.
//! `CLINERULES_LOG` accepts any `EnvFilter` directive (`debug`,
//! `clinerules_build=trace`, ...).

use crate::config::LOG_ENV;
use anyhow::{Context, Result, anyhow};
use std::io;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// Fails on a filter directive `EnvFilter` cannot parse, or if a subscriber is
/// already installed.
pub fn init_logging(filter: &str) -> Result<()> {
    let filter = parse_filter(filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(())
}

fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| format!("invalid {LOG_ENV} filter '{directive}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_level_and_target_directives() {
        assert!(parse_filter("debug").is_ok());
        assert!(parse_filter("clinerules_build=trace").is_ok());
    }

    #[test]
    fn rejects_unknown_level() {
        let err = parse_filter("clinerules_build=loudest").expect_err("bad level");
        assert!(format!("{err:#}").contains("CLINERULES_LOG"));
    }
}
