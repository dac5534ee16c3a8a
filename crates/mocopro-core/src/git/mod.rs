//! Git operations for checking out server repositories.
//!
//! The lifecycle commands only need three things from git: a shallow clone,
//! a pull, and the name of the checked-out branch. [`GitClient`] is that
//! seam; [`GitFetcher`] implements it with the `git` binary.

mod fetcher;

use std::path::Path;

pub use fetcher::GitFetcher;

use crate::error::Result;

/// Git operations used by install and update.
pub trait GitClient {
    /// Shallow-clone `url` into `dest`, optionally checking out `branch`.
    fn clone_repo(&self, url: &str, dest: &Path, branch: Option<&str>) -> Result<()>;

    /// Pull the latest changes into the checkout at `path`.
    fn pull(&self, path: &Path) -> Result<()>;

    /// Name of the branch checked out at `path`.
    fn current_branch(&self, path: &Path) -> Result<String>;
}
