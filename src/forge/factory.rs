//! forge::factory
//!
//! Forge creation.
//!
//! # Design
//!
//! This module provides the single construction point for forge instances.
//! Commands use `create_forge()` instead of directly importing specific
//! forge implementations, ensuring the architecture boundary is maintained:
//! everything above this layer works against `Box<dyn Forge>`.
//!
//! v1 supports GitHub only; the boundary keeps command code unchanged if
//! other providers are added.
//!
//! # Example
//!
//! ```
//! use ghpush::forge::{create_forge, RepoCoordinate};
//!
//! let forge = create_forge(
//!     RepoCoordinate::new("octocat", "hello-world"),
//!     "ghp_token",
//!     None, // public API
//! );
//! assert_eq!(forge.name(), "github");
//! ```

use super::github::GitHubForge;
use super::traits::{Forge, RepoCoordinate};

/// Create a forge for a repository coordinate and token.
///
/// This is the primary entry point for creating forge instances in
/// commands.
///
/// # Arguments
///
/// * `coordinate` - Repository owner and name
/// * `token` - Authentication token for the forge
/// * `api_base` - Custom API base URL (GitHub Enterprise); `None` for the
///   public API
pub fn create_forge(
    coordinate: RepoCoordinate,
    token: &str,
    api_base: Option<&str>,
) -> Box<dyn Forge> {
    match api_base {
        Some(base) => Box::new(GitHubForge::with_api_base(token, coordinate, base)),
        None => Box::new(GitHubForge::new(token, coordinate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_github_forge() {
        let forge = create_forge(RepoCoordinate::new("owner", "repo"), "token", None);
        assert_eq!(forge.name(), "github");
    }

    #[test]
    fn creates_github_forge_with_api_base() {
        let forge = create_forge(
            RepoCoordinate::new("owner", "repo"),
            "token",
            Some("https://github.example.com/api/v3"),
        );
        assert_eq!(forge.name(), "github");
    }
}
