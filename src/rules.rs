//! Discovery and ordering of rule fragments under `.cline/rules/`.
//!
//! Every `*.md` file in the tree is a rule. Output order depends only on the
//! file names (byte-wise), never on how the filesystem happens to enumerate
//! directories. Traversal problems abort the build; a single unreadable rule
//! is reported and left out.

use crate::config::RulePaths;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const RULE_SUFFIX: &str = ".md";
pub const RULE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
/// A rule file found during traversal.
///
/// Ordering compares `name` first and `relative` second, which is the order
/// rules are emitted in.
pub struct RuleFile {
    /// Leaf file name, e.g. `10-style.md`.
    pub name: String,
    /// Path relative to the rules root, e.g. `lang/10-style.md`.
    pub relative: PathBuf,
}

impl RuleFile {
    /// Where the rule is read from under `policy`.
    pub fn resolve(&self, root: &Path, policy: RulePaths) -> PathBuf {
        match policy {
            RulePaths::Flat => root.join(&self.name),
            RulePaths::Nested => root.join(&self.relative),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A rule that was read successfully.
pub struct RuleDocument {
    pub name: String,
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Outcome of aggregating the rules directory.
pub struct RuleSet {
    /// Number of `.md` files found by traversal.
    pub discovered: usize,
    /// Rules that were read, in output order.
    pub documents: Vec<RuleDocument>,
    /// Resolved paths that could not be read.
    pub skipped: Vec<PathBuf>,
}

impl RuleSet {
    /// Rule bodies joined by a blank line.
    pub fn joined(&self) -> String {
        self.documents
            .iter()
            .map(|doc| doc.contents.as_str())
            .collect::<Vec<_>>()
            .join(RULE_SEPARATOR)
    }
}

/// Collect every rule file below `root`, sorted for output.
///
/// The walk does not follow symlinked directories. Any I/O error while
/// listing a directory is returned to the caller.
pub fn collect_rule_files(root: &Path) -> Result<Vec<RuleFile>> {
    let mut files = Vec::new();
    collect_from_dir(root, root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_from_dir(root: &Path, dir: &Path, acc: &mut Vec<RuleFile>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("walking rules directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("walking rules directory {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("inspecting {}", path.display()))?;
        if file_type.is_dir() {
            collect_from_dir(root, &path, acc)?;
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(RULE_SUFFIX) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        acc.push(RuleFile { name, relative });
    }
    Ok(())
}

/// Read `files` (already sorted) from `root`, one entry per discovered file.
///
/// With [`RulePaths::Flat`] rules sharing a leaf name all resolve to the same
/// file at the root, so that file is read once per occurrence. Contents that
/// are not valid UTF-8 are kept with invalid sequences replaced.
pub fn read_rules(root: &Path, files: &[RuleFile], policy: RulePaths) -> RuleSet {
    let mut set = RuleSet {
        discovered: files.len(),
        ..RuleSet::default()
    };

    for file in files {
        let path = file.resolve(root, policy);
        match fs::read(&path) {
            Ok(bytes) => set.documents.push(RuleDocument {
                name: file.name.clone(),
                path,
                contents: String::from_utf8_lossy(&bytes).into_owned(),
            }),
            Err(err) => {
                warn!("skipping rule {}: {err}", path.display());
                set.skipped.push(path);
            }
        }
    }

    set
}

/// Walk `root` and read every rule in output order.
pub fn aggregate_rules(root: &Path, policy: RulePaths) -> Result<RuleSet> {
    let files = collect_rule_files(root)?;
    debug!(
        "found {} rule files under {} ({} layout)",
        files.len(),
        root.display(),
        policy.as_str()
    );
    Ok(read_rules(root, &files, policy))
}
