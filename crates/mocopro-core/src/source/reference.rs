//! GitHub repository reference parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static GITHUB_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?i:https?)://)?(?:(?i:www)\.)?(?i:github\.com)/([^/#]+)/([^/#]+?)(?:\.git)?(?:#(.*))?$",
    )
    .expect("GitHub URL pattern is valid")
});

static SHORT_FORM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^/#]+)/([^/#]+)(?:#(.*))?$").expect("short form pattern is valid")
});

/// A normalized GitHub repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repository: String,
    /// Branch or tag requested with a `#ref` suffix
    pub branch: Option<String>,
    /// Canonical clone URL, always `https://github.com/{owner}/{repository}.git`
    pub full_url: String,
}

impl RepositoryRef {
    /// Build a reference from known coordinates.
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        let owner = owner.into();
        let repository = repository.into();
        let full_url = canonical_url(&owner, &repository);
        Self {
            owner,
            repository,
            branch: None,
            full_url,
        }
    }

    /// Set the requested branch or tag.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Parse a user-supplied repository string.
    ///
    /// Supports formats (first match wins):
    /// - `https://github.com/owner/repo`, with or without scheme, `www.`,
    ///   trailing `.git` and `#ref`
    /// - `owner/repo`
    /// - `owner/repo#ref`
    pub fn parse(input: &str) -> Result<Self> {
        let captures = GITHUB_URL_PATTERN
            .captures(input)
            .or_else(|| SHORT_FORM_PATTERN.captures(input))
            .ok_or_else(|| Error::InvalidRepository(input.to_string()))?;

        let owner = &captures[1];
        let repository = &captures[2];
        let branch = captures
            .get(3)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty());

        let parsed = Self::new(owner, repository);
        Ok(match branch {
            Some(branch) => parsed.with_branch(branch),
            None => parsed,
        })
    }

    /// Deterministic image name for this repository.
    pub fn image_name(&self) -> String {
        super::image_name(&self.owner, &self.repository)
    }

    /// Deterministic container name for this repository.
    pub fn container_name(&self) -> String {
        super::container_name(&self.repository)
    }
}

fn canonical_url(owner: &str, repository: &str) -> String {
    format!("https://github.com/{}/{}.git", owner, repository)
}
