//! Build step that turns `.cline/` sources into `.clinerules` and `.roomodes`.
//!
//! Rule fragments under `.cline/rules/` are concatenated in file-name order
//! into `.clinerules`. Mode documents under `.cline/roomodes/` are parsed for
//! a small header and collected into the `.roomodes` JSON manifest, and a
//! short index of those modes is appended to the rules text.
//!
//! The library never consults the process working directory: callers resolve
//! a root once and pass a [`BuildLayout`] down. The `build-clinerules` binary
//! is the only place that reads ambient state.

use anyhow::{Result, bail};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

pub mod config;
pub mod front_matter;
pub mod logging;
pub mod modes;
pub mod output;
pub mod rules;

pub use config::{BuildConfig, BuildLayout, RulePaths};
pub use front_matter::{FrontMatter, HeaderValue, parse_front_matter};
pub use modes::{Mode, ModeManifest, load_modes};
pub use output::{render_rules_document, write_outputs};
pub use rules::{RuleDocument, RuleFile, RuleSet, aggregate_rules, collect_rule_files};

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a completed build produced.
pub struct BuildSummary {
    pub modes: usize,
    pub rules_discovered: usize,
    pub rules_included: usize,
    pub rules_skipped: usize,
    pub modes_output: PathBuf,
    pub rules_output: PathBuf,
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated {} from {} mode files and {} from {} rule files",
            self.modes_output.display(),
            self.modes,
            self.rules_output.display(),
            self.rules_included
        )?;
        if self.rules_skipped > 0 {
            write!(f, " ({} skipped)", self.rules_skipped)?;
        }
        Ok(())
    }
}

/// Run one full build against `layout`.
///
/// The rules directory must exist; nothing is written when it does not. Modes
/// are optional. Unreadable individual files are logged and left out, while
/// traversal, encoding, and write failures abort with an error.
pub fn run_build(layout: &BuildLayout, config: &BuildConfig) -> Result<BuildSummary> {
    if !layout.rules_dir.is_dir() {
        bail!("rules directory not found: {}", layout.rules_dir.display());
    }

    let modes = load_modes(&layout.modes_dir);
    info!("loaded {} modes from {}", modes.len(), layout.modes_dir.display());

    let rules = aggregate_rules(&layout.rules_dir, config.rule_paths)?;
    info!(
        "read {} of {} rule files from {}",
        rules.documents.len(),
        rules.discovered,
        layout.rules_dir.display()
    );

    let document = render_rules_document(&rules.joined(), &modes, layout.root());
    write_outputs(&modes, &layout.modes_output, &document, &layout.rules_output)?;

    Ok(BuildSummary {
        modes: modes.len(),
        rules_discovered: rules.discovered,
        rules_included: rules.documents.len(),
        rules_skipped: rules.skipped.len(),
        modes_output: layout.modes_output.clone(),
        rules_output: layout.rules_output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn summary_mentions_counts_and_skips() {
        let summary = BuildSummary {
            modes: 2,
            rules_discovered: 4,
            rules_included: 3,
            rules_skipped: 1,
            modes_output: PathBuf::from("/w/.roomodes"),
            rules_output: PathBuf::from("/w/.clinerules"),
        };
        assert_eq!(
            summary.to_string(),
            "Generated /w/.roomodes from 2 mode files and /w/.clinerules from 3 rule files (1 skipped)"
        );
    }

    #[test]
    fn run_build_requires_rules_dir() {
        let temp = TempDir::new().expect("temp dir");
        let layout = BuildLayout::from_root(temp.path());
        let err = run_build(&layout, &BuildConfig::default()).expect_err("no rules dir");
        assert!(err.to_string().contains("rules directory not found"));
        assert!(!layout.rules_output.exists());
        assert!(!layout.modes_output.exists());
    }

    #[test]
    fn run_build_without_modes_writes_plain_rules() {
        let temp = TempDir::new().expect("temp dir");
        let layout = BuildLayout::from_root(temp.path());
        fs::create_dir_all(&layout.rules_dir).unwrap();
        fs::write(layout.rules_dir.join("one.md"), "Hello").unwrap();
        fs::write(layout.rules_dir.join("two.md"), "World").unwrap();

        let summary = run_build(&layout, &BuildConfig::default()).expect("build");
        assert_eq!(summary.modes, 0);
        assert_eq!(summary.rules_included, 2);
        assert_eq!(
            fs::read_to_string(&layout.rules_output).unwrap(),
            "Hello\n\nWorld"
        );
        assert_eq!(
            fs::read_to_string(&layout.modes_output).unwrap(),
            "{\n  \"customModes\": []\n}"
        );
    }

    #[test]
    fn run_build_appends_mode_index() {
        let temp = TempDir::new().expect("temp dir");
        let layout = BuildLayout::from_root(temp.path());
        fs::create_dir_all(&layout.rules_dir).unwrap();
        fs::create_dir_all(&layout.modes_dir).unwrap();
        fs::write(layout.rules_dir.join("base.md"), "Base").unwrap();
        fs::write(
            layout.modes_dir.join("x.md"),
            "---\nname: X Mode\n---\nDo x.",
        )
        .unwrap();

        let summary = run_build(&layout, &BuildConfig::default()).expect("build");
        assert_eq!(summary.modes, 1);
        let rules = fs::read_to_string(&layout.rules_output).unwrap();
        let index_lines: Vec<_> = rules.lines().filter(|line| line.starts_with("- ")).collect();
        assert_eq!(index_lines, vec!["- x X Mode at .cline/roomodes/x.md"]);
    }
}
