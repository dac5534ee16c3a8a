//! Repository references and the names derived from them.
//!
//! Users refer to servers by GitHub coordinates in a handful of shapes
//! (`owner/repo`, `owner/repo#ref`, full URLs). Everything downstream works
//! on the normalized [`RepositoryRef`] and on the image/container names
//! computed from it.

mod reference;

pub use reference::RepositoryRef;

/// Namespace prefix shared by every image and container mocopro creates.
pub const NAME_PREFIX: &str = "mocopro";

/// Image name for a repository: `mocopro/{owner}-{repository}`.
pub fn image_name(owner: &str, repository: &str) -> String {
    format!("{}/{}-{}", NAME_PREFIX, owner, repository)
}

/// Container name for a repository: `mocopro-{repository}`.
///
/// Keyed by repository only. Two owners publishing a repository with the
/// same name share one container name.
pub fn container_name(repository: &str) -> String {
    format!("{}-{}", NAME_PREFIX, repository)
}

/// Full image reference `name:tag`.
pub fn image_reference(image_name: &str, image_tag: &str) -> String {
    format!("{}:{}", image_name, image_tag)
}
