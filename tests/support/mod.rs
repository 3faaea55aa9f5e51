use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Temporary project directory with a `.cline/` tree.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp workspace"),
        }
    }

    pub fn with_rules_dir() -> Self {
        let workspace = Self::new();
        fs::create_dir_all(workspace.rules_dir()).expect("create rules dir");
        workspace
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn rules_dir(&self) -> PathBuf {
        self.root().join(".cline").join("rules")
    }

    pub fn modes_dir(&self) -> PathBuf {
        self.root().join(".cline").join("roomodes")
    }

    pub fn rules_output(&self) -> PathBuf {
        self.root().join(".clinerules")
    }

    pub fn modes_output(&self) -> PathBuf {
        self.root().join(".roomodes")
    }

    pub fn write_rule(&self, relative: &str, contents: &str) -> PathBuf {
        write_file(&self.rules_dir().join(relative), contents)
    }

    pub fn write_mode(&self, name: &str, contents: &str) -> PathBuf {
        write_file(&self.modes_dir().join(name), contents)
    }

    /// Run the binary in this workspace, returning its output regardless of status.
    pub fn build(&self) -> Result<Output> {
        self.build_with_env(&[])
    }

    pub fn build_with_env(&self, vars: &[(&str, &str)]) -> Result<Output> {
        let mut cmd = Command::new(binary());
        cmd.current_dir(self.root())
            .env_remove("CLINERULES_LOG")
            .env_remove("CLINERULES_RULE_PATHS");
        for (key, value) in vars {
            cmd.env(key, value);
        }
        cmd.output()
            .with_context(|| format!("failed to run command: {:?}", cmd))
    }

    /// Run the binary and require a zero exit status.
    pub fn build_ok(&self) -> Result<Output> {
        let output = self.build()?;
        if output.status.success() {
            Ok(output)
        } else {
            bail!(
                "build failed: status {:?}\nstdout: {}\nstderr: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            )
        }
    }

    pub fn read_rules_output(&self) -> String {
        fs::read_to_string(self.rules_output()).expect("read .clinerules")
    }
}

pub fn binary() -> &'static str {
    env!("CARGO_BIN_EXE_build-clinerules")
}

fn write_file(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write fixture");
    path.to_path_buf()
}
