//! Install and update.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::ServerManager;
use crate::error::{Error, Result};
use crate::image::ImageBuilder;
use crate::registry::{ServerRecord, ServerUpdate};
use crate::runtime::ContainerRuntime;
use crate::source::RepositoryRef;

/// Report from an install operation
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Registry name of the new server
    pub name: String,
    pub owner: String,
    pub repository: String,
    /// Branch or tag the image was built from
    pub branch: String,
    /// Full image reference
    pub image: String,
    /// Local checkout
    pub checkout: PathBuf,
}

/// Report from an update operation
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub name: String,
    pub image: String,
}

impl ServerManager {
    /// Clone a repository, build its image and register it.
    ///
    /// The checkout is deleted again when cloning or building fails; the
    /// registry is only written after a successful build.
    pub fn install(&self, input: &str) -> Result<InstallReport> {
        let repo = RepositoryRef::parse(input)?;
        let registry = self.registry();
        if registry.exists(&repo.repository)? {
            return Err(Error::AlreadyInstalled(repo.repository));
        }

        let runtime = self.runtime()?;
        let checkout = self.ctx.repository_path(&repo.owner, &repo.repository);
        info!("Installing MCP server from {}/{}", repo.owner, repo.repository);

        let record = match self.checkout_and_build(&repo, &checkout, runtime) {
            Ok(record) => record,
            Err(e) => {
                remove_checkout(&checkout);
                return Err(e);
            }
        };

        registry.add(record.clone())?;
        info!("Installed {}", record.name);

        Ok(InstallReport {
            image: record.image_reference(),
            name: record.name,
            owner: record.owner,
            repository: record.repository,
            branch: record.branch,
            checkout,
        })
    }

    fn checkout_and_build(
        &self,
        repo: &RepositoryRef,
        checkout: &Path,
        runtime: &dyn ContainerRuntime,
    ) -> Result<ServerRecord> {
        if checkout.exists() {
            warn!("Replacing stale checkout at {}", checkout.display());
            remove_dir(checkout)?;
        }

        self.git
            .clone_repo(&repo.full_url, checkout, repo.branch.as_deref())?;

        let branch = match &repo.branch {
            Some(branch) => branch.clone(),
            None => self.git.current_branch(checkout)?,
        };
        let record = ServerRecord::new(repo, branch);

        ImageBuilder::new(runtime).build(checkout, &record.image_name, &record.image_tag)?;
        Ok(record)
    }

    /// Pull the latest changes and rebuild the image under its existing tag.
    pub fn update(&self, name: &str) -> Result<UpdateReport> {
        let registry = self.registry();
        let record = registry.require(name)?;
        let runtime = self.runtime()?;
        let checkout = self.ctx.repository_path(&record.owner, &record.repository);

        info!("Updating {}", name);
        self.git.pull(&checkout)?;
        ImageBuilder::new(runtime).build(&checkout, &record.image_name, &record.image_tag)?;

        let record = registry.update(name, ServerUpdate::new().touch())?;
        Ok(UpdateReport {
            name: record.name.clone(),
            image: record.image_reference(),
        })
    }
}

/// Delete a checkout directory. A missing directory is fine.
pub(super) fn remove_dir(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(
            format!("Failed to remove {}", path.display()),
            e,
        )),
    }
}

fn remove_checkout(path: &Path) {
    if let Err(e) = remove_dir(path) {
        warn!("{}", e);
    }
}
