//! Directory layout and environment-driven settings for a build.
//!
//! Everything is anchored on an explicit root (the invocation directory) so
//! library callers and tests never depend on the process working directory.

use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".cline";
pub const RULES_DIR: &str = "rules";
pub const MODES_DIR: &str = "roomodes";
pub const RULES_OUTPUT: &str = ".clinerules";
pub const MODES_OUTPUT: &str = ".roomodes";

pub const LOG_ENV: &str = "CLINERULES_LOG";
pub const RULE_PATHS_ENV: &str = "CLINERULES_RULE_PATHS";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Input and output locations derived from a single root directory.
pub struct BuildLayout {
    pub root: PathBuf,
    pub rules_dir: PathBuf,
    pub modes_dir: PathBuf,
    pub rules_output: PathBuf,
    pub modes_output: PathBuf,
}

impl BuildLayout {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config_dir = root.join(CONFIG_DIR);
        Self {
            rules_dir: config_dir.join(RULES_DIR),
            modes_dir: config_dir.join(MODES_DIR),
            rules_output: root.join(RULES_OUTPUT),
            modes_output: root.join(MODES_OUTPUT),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// How rule files found in subdirectories are resolved before reading.
pub enum RulePaths {
    /// Keep only the leaf file name and read it from the rules root. Nested
    /// rules therefore resolve only when a same-named file sits at the root.
    #[default]
    Flat,
    /// Read each rule from where it was found.
    Nested,
}

impl RulePaths {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "nested" => Ok(Self::Nested),
            other => bail!("{RULE_PATHS_ENV} must be 'flat' or 'nested', got '{other}'"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Nested => "nested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Tunables that do not change where inputs live.
pub struct BuildConfig {
    pub log_filter: String,
    pub rule_paths: RulePaths,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            rule_paths: RulePaths::default(),
        }
    }
}

impl BuildConfig {
    /// Read settings from `CLINERULES_LOG` and `CLINERULES_RULE_PATHS`.
    ///
    /// Unset or blank variables fall back to defaults; an unrecognised rule
    /// path policy is an error so a typo does not silently change output.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_non_empty)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(filter) = lookup(LOG_ENV) {
            config.log_filter = filter;
        }
        if let Some(policy) = lookup(RULE_PATHS_ENV) {
            config.rule_paths = RulePaths::parse(&policy)?;
        }
        Ok(config)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
