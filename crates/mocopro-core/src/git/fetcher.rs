//! `git` command line backend.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info};

use super::GitClient;
use crate::error::{Error, Result};

/// Environment overrides that would redirect git away from the checkout we
/// point it at.
const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

/// Runs git operations through the `git` executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }

    fn run_git<S: AsRef<OsStr>>(cwd: Option<&Path>, args: &[S]) -> Result<Output> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        for var in GIT_ENV_OVERRIDES {
            cmd.env_remove(var);
        }
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        debug!("Running {:?}", cmd);
        let output = cmd.output().map_err(|source| Error::Spawn {
            program: "git".to_string(),
            source,
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git {
                action: args
                    .first()
                    .map(|arg| arg.as_ref().to_string_lossy().into_owned())
                    .unwrap_or_else(|| "command".to_string()),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl GitClient for GitFetcher {
    fn clone_repo(&self, url: &str, dest: &Path, branch: Option<&str>) -> Result<()> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    format!("Failed to create directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let args = clone_args(url, dest, branch);
        info!("Cloning {} into {}", url, dest.display());
        Self::run_git(None, &args)?;
        Ok(())
    }

    fn pull(&self, path: &Path) -> Result<()> {
        info!("Pulling latest changes in {}", path.display());
        Self::run_git(Some(path), &["pull"])?;
        Ok(())
    }

    fn current_branch(&self, path: &Path) -> Result<String> {
        let output = Self::run_git(Some(path), &["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn clone_args(url: &str, dest: &Path, branch: Option<&str>) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["clone", "--depth", "1"].map(OsString::from).to_vec();
    if let Some(branch) = branch {
        args.push("--branch".into());
        args.push(branch.into());
    }
    args.push(url.into());
    args.push(dest.as_os_str().to_os_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn clone_is_shallow() {
        let args = clone_args("https://github.com/a/b.git", Path::new("/tmp/a_b"), None);
        assert_eq!(
            args,
            os_args(&["clone", "--depth", "1", "https://github.com/a/b.git", "/tmp/a_b"])
        );
    }

    #[test]
    fn clone_with_branch() {
        let args = clone_args(
            "https://github.com/a/b.git",
            Path::new("/tmp/a_b"),
            Some("v1.0.0"),
        );
        assert_eq!(
            args,
            os_args(&[
                "clone",
                "--depth",
                "1",
                "--branch",
                "v1.0.0",
                "https://github.com/a/b.git",
                "/tmp/a_b",
            ])
        );
    }

    #[cfg(unix)]
    #[test]
    fn clone_keeps_non_utf8_destination() {
        use std::os::unix::ffi::OsStrExt;

        let dest = Path::new(OsStr::from_bytes(b"/tmp/repos/acme_\xffweather"));
        let args = clone_args("https://github.com/a/b.git", dest, None);
        assert_eq!(args.last().map(OsString::as_os_str), Some(dest.as_os_str()));
    }
}
