//! Uninstall command implementation.
//!
//! Removes a server's container, image, checkout and registry record.
//! Container and image removal are best-effort: a server whose image is
//! already gone must still be uninstallable.

use tracing::{info, warn};

use super::ServerManager;
use super::install::remove_dir;
use crate::error::Result;
use crate::image::ImageBuilder;

/// Report from an uninstall operation
#[derive(Debug, Clone)]
pub struct UninstallReport {
    /// Name of the removed server
    pub name: String,
    /// Problems that did not stop the uninstall
    pub warnings: Vec<String>,
}

impl ServerManager {
    pub fn uninstall(&self, name: &str) -> Result<UninstallReport> {
        let registry = self.registry();
        let record = registry.require(name)?;
        let mut warnings = Vec::new();

        info!("Uninstalling {}", name);
        match self.runtime() {
            Ok(runtime) => {
                if let Err(e) = runtime.remove(&record.repository) {
                    warn!("Failed to remove container for {}: {}", name, e);
                    warnings.push(format!("Container not removed: {}", e));
                }
                if let Err(e) = ImageBuilder::new(runtime).remove(&record.image_name, &record.image_tag)
                {
                    warn!("Failed to remove image {}: {}", record.image_reference(), e);
                    warnings.push(format!("Image not removed: {}", e));
                }
            }
            Err(e) => {
                warn!("Skipping container cleanup for {}: {}", name, e);
                warnings.push(format!("Container and image not removed: {}", e));
            }
        }

        let checkout = self.ctx.repository_path(&record.owner, &record.repository);
        remove_dir(&checkout)?;

        registry.remove(name)?;
        Ok(UninstallReport {
            name: record.name,
            warnings,
        })
    }
}
