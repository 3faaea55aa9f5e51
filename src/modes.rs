//! Custom mode documents and the `.roomodes` manifest model.
//!
//! Each file directly inside `.cline/roomodes/` defines one mode. The file
//! name (minus a `.md` suffix) becomes the slug, the header supplies optional
//! metadata, and the remaining body is the role definition. Loading is
//! best-effort: unreadable files are reported and skipped so one bad mode does
//! not block the rules build.

use crate::front_matter::parse_front_matter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MODE_SUFFIX: &str = ".md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry of the `customModes` array.
///
/// Field order matches the manifest layout. `name`, `groups`, and `source`
/// are left out of the JSON when empty; `__filename` is always written.
pub struct Mode {
    pub slug: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "roleDefinition")]
    pub role_definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(rename = "__filename")]
    pub filename: PathBuf,
}

impl Mode {
    /// Build a mode from a document already in memory.
    ///
    /// Only the `name`, `groups`, and `source` header keys are used, and only
    /// when they hold the expected shape (scalar, array, scalar). Anything
    /// else in the header is ignored.
    pub fn from_document(slug: impl Into<String>, filename: PathBuf, content: &str) -> Self {
        let (front_matter, body) = parse_front_matter(content);
        Self {
            slug: slug.into(),
            name: front_matter.scalar("name").unwrap_or_default().to_string(),
            role_definition: body.to_string(),
            groups: front_matter
                .list("groups")
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            source: front_matter.scalar("source").unwrap_or_default().to_string(),
            filename,
        }
    }

    /// Read and parse a mode file. Invalid UTF-8 is replaced, not rejected.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let contents = String::from_utf8_lossy(&bytes);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filename = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Ok(Self::from_document(mode_slug(&file_name), filename, &contents))
    }
}

/// Derive the slug from a file name by dropping one trailing `.md`.
pub fn mode_slug(file_name: &str) -> &str {
    file_name.strip_suffix(MODE_SUFFIX).unwrap_or(file_name)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Top-level `.roomodes` document.
pub struct ModeManifest {
    #[serde(rename = "customModes")]
    pub custom_modes: Vec<Mode>,
}

impl ModeManifest {
    pub fn len(&self) -> usize {
        self.custom_modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.custom_modes.is_empty()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("encoding mode manifest")
    }
}

/// Load every mode file directly under `dir`, in directory listing order.
///
/// A missing directory yields an empty manifest. Listing failures and
/// per-file read failures are logged and skipped; subdirectories are ignored.
pub fn load_modes(dir: &Path) -> ModeManifest {
    let mut manifest = ModeManifest::default();
    if !dir.exists() {
        debug!("modes directory {} not present; skipping", dir.display());
        return manifest;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("unable to list modes directory {}: {err}", dir.display());
            return manifest;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("unable to read entry in {}: {err}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        match Mode::from_file(&path) {
            Ok(mode) => {
                debug!("loaded mode {} from {}", mode.slug, path.display());
                manifest.custom_modes.push(mode);
            }
            Err(err) => warn!("skipping mode file: {err:#}"),
        }
    }

    manifest
}
