//! Container image building.
//!
//! A repository is buildable when it ships a `Dockerfile`. When it only has
//! a `smithery.yaml` manifest, a Dockerfile is synthesized next to it before
//! the build runs.

mod manifest;

use std::path::Path;

use tracing::info;

pub use manifest::{
    LaunchCommand, MANIFEST_FILE_NAME, SmitheryManifest, StartCommand, generate_dockerfile,
};

use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use crate::source;

pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Builds and removes server images through a container runtime.
pub struct ImageBuilder<'a> {
    runtime: &'a dyn ContainerRuntime,
}

impl<'a> ImageBuilder<'a> {
    pub fn new(runtime: &'a dyn ContainerRuntime) -> Self {
        Self { runtime }
    }

    /// Make sure `repository_path` contains a `Dockerfile`, writing one from
    /// `smithery.yaml` when needed.
    pub fn ensure_build_context(&self, repository_path: &Path) -> Result<()> {
        let dockerfile = repository_path.join(DOCKERFILE_NAME);
        if dockerfile.is_file() {
            return Ok(());
        }

        let manifest = SmitheryManifest::read(repository_path)
            .ok_or_else(|| Error::NoBuildContext(repository_path.to_path_buf()))?;

        info!("Generating Dockerfile from {}", MANIFEST_FILE_NAME);
        std::fs::write(&dockerfile, manifest.to_dockerfile()).map_err(|e| {
            Error::io(
                format!("Failed to write Dockerfile: {}", dockerfile.display()),
                e,
            )
        })
    }

    /// Build `image_name:image_tag` from the checkout at `repository_path`.
    pub fn build(&self, repository_path: &Path, image_name: &str, image_tag: &str) -> Result<()> {
        self.ensure_build_context(repository_path)?;
        let image_ref = source::image_reference(image_name, image_tag);
        self.runtime.build_image(repository_path, &image_ref)
    }

    pub fn remove(&self, image_name: &str, image_tag: &str) -> Result<()> {
        self.runtime
            .remove_image(&source::image_reference(image_name, image_tag))
    }

    pub fn exists(&self, image_name: &str, image_tag: &str) -> bool {
        self.runtime
            .image_exists(&source::image_reference(image_name, image_tag))
    }
}
