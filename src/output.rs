//! Rendering and writing of `.clinerules` and `.roomodes`.
//!
//! Both files are regenerated from scratch on every build. The manifest is
//! written first; any failure to encode or write either file is fatal and
//! names the file involved.

use crate::modes::ModeManifest;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

pub const MODE_INDEX_HEADING: &str = "This project defines the following modes:";

#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// Combine the joined rules text with the mode index.
///
/// The index is only appended when at least one mode exists. Each mode gets a
/// `- <slug> <name> at <path>` line, with the path relative to `root` when one
/// can be computed.
pub fn render_rules_document(rules_text: &str, modes: &ModeManifest, root: &Path) -> String {
    let mut document = rules_text.to_string();
    if modes.is_empty() {
        return document;
    }

    if !document.is_empty() {
        document.push_str("\n\n");
    }
    document.push_str(MODE_INDEX_HEADING);
    for mode in &modes.custom_modes {
        let location =
            relative_path(&mode.filename, root).unwrap_or_else(|| mode.filename.clone());
        document.push_str(&format!(
            "\n- {} {} at {}",
            mode.slug,
            mode.name,
            location.display()
        ));
    }
    document
}

/// Lexical path from `base` to `target`, without touching the filesystem.
///
/// Returns `None` when no relative path exists: one side is absolute and the
/// other is not, the paths sit under different prefixes, or `base` climbs
/// through `..` past the shared part.
pub fn relative_path(target: &Path, base: &Path) -> Option<PathBuf> {
    if target.is_absolute() != base.is_absolute() {
        return None;
    }

    let target_components: Vec<_> = normalized_components(target);
    let base_components: Vec<_> = normalized_components(base);

    let mut shared_prefix_len = 0usize;
    while shared_prefix_len < target_components.len()
        && shared_prefix_len < base_components.len()
        && target_components[shared_prefix_len] == base_components[shared_prefix_len]
    {
        shared_prefix_len += 1;
    }

    let mut relative = PathBuf::new();
    for component in base_components.iter().skip(shared_prefix_len) {
        match component {
            Component::Normal(_) => relative.push(".."),
            _ => return None,
        }
    }
    for component in target_components.iter().skip(shared_prefix_len) {
        match component {
            Component::Normal(seg) => relative.push(seg),
            Component::ParentDir => relative.push(".."),
            _ => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

fn normalized_components(path: &Path) -> Vec<Component<'_>> {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is still `/`.
                Some(Component::RootDir) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    components
}

/// Overwrite `path` with `contents` and leave it owner-writable, world-readable.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(OUTPUT_MODE))
            .with_context(|| format!("setting permissions on {}", path.display()))?;
    }
    Ok(())
}

/// Write the manifest, then the rules document.
pub fn write_outputs(
    modes: &ModeManifest,
    modes_output: &Path,
    rules_document: &str,
    rules_output: &Path,
) -> Result<()> {
    let manifest = modes
        .to_json()
        .with_context(|| format!("preparing {}", modes_output.display()))?;
    write_output(modes_output, &manifest)?;
    info!("wrote {} with {} modes", modes_output.display(), modes.len());

    write_output(rules_output, rules_document)?;
    info!("wrote {}", rules_output.display());
    Ok(())
}
