//! forge::traits
//!
//! Forge trait definition for interacting with remote hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully.
//!
//! The trait exposes the forge's git-data object model directly: blobs hold
//! file bytes, trees map paths to blobs, commits reference one tree and
//! their parents, and refs are mutable pointers to commits. Every SHA a
//! method returns is an opaque handle minted by the forge; callers thread
//! it into the next call and never construct one from local hashing.
//!
//! # Example
//!
//! ```ignore
//! use ghpush::forge::{Forge, ForgeError, TreeSha};
//!
//! async fn tip_tree(forge: &dyn Forge, branch: &str) -> Result<TreeSha, ForgeError> {
//!     let tip = forge.get_branch_ref(branch).await?;
//!     let commit = forge.get_commit(&tip).await?;
//!     Ok(commit.tree)
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub. All variants originate
/// from the remote transport; none are synthesized locally.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found (branch, commit, tree, or blob).
    #[error("not found: {0}")]
    NotFound(String),

    /// A ref update was rejected (non-fast-forward or protected branch).
    #[error("ref update rejected: {0}")]
    RefUpdateRejected(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// SHA of a commit object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitSha(String);

impl CommitSha {
    /// Wrap a hex SHA string returned by the forge.
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    /// The hex string form, as the forge returned it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SHA of a tree object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeSha(String);

impl TreeSha {
    /// Wrap a hex SHA string returned by the forge.
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    /// The hex string form, as the forge returned it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TreeSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SHA of a blob object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobSha(String);

impl BlobSha {
    /// Wrap a hex SHA string returned by the forge.
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    /// The hex string form, as the forge returned it.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commit metadata returned from the forge.
///
/// Principally consumed for its root tree SHA; parents and message are
/// carried for inspection and tests.
#[derive(Debug, Clone)]
pub struct Commit {
    /// The commit's own SHA
    pub sha: CommitSha,
    /// Root tree of the commit
    pub tree: TreeSha,
    /// Parent commit SHAs (root commits have none)
    pub parents: Vec<CommitSha>,
    /// Commit message
    pub message: String,
}

/// Git mode for a regular, non-executable file.
///
/// The only mode this client ever writes. An existing entry at the same
/// path is overwritten as a regular file regardless of its prior mode.
pub const REGULAR_FILE_MODE: &str = "100644";

/// A single tree entry being added or replaced.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path within the tree (forward-slash separated)
    pub path: String,
    /// Blob holding the file content
    pub sha: BlobSha,
}

impl FileEntry {
    /// The git mode this entry is written with.
    ///
    /// Fixed at [`REGULAR_FILE_MODE`]; no other mode is ever emitted.
    pub fn mode(&self) -> &'static str {
        REGULAR_FILE_MODE
    }
}

/// The authenticated user, from the forge's account endpoint.
#[derive(Debug, Clone)]
pub struct User {
    /// Account login name
    pub login: String,
    /// Display name, if the account has one
    pub name: Option<String>,
}

/// Summary of a repository owned by (or visible to) the authenticated user.
#[derive(Debug, Clone)]
pub struct RepoSummary {
    /// Repository name without owner
    pub name: String,
    /// Full `owner/name` form
    pub full_name: String,
    /// Whether the repository is private
    pub private: bool,
    /// Web URL for viewing
    pub url: String,
}

/// Identifies a repository on a forge: owner (user or organization) plus
/// repository name.
///
/// Immutable once constructed; supplied to the forge at construction and
/// reused on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinate {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoCoordinate {
    /// Create a coordinate from owner and repo parts.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse a coordinate from `owner/repo` shorthand or a remote URL.
    ///
    /// Supported forms:
    /// - `owner/repo`
    /// - `git@github.com:owner/repo.git`
    /// - `https://github.com/owner/repo` (with or without `.git`)
    ///
    /// # Returns
    ///
    /// `Some(RepoCoordinate)` if the string is parseable, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use ghpush::forge::RepoCoordinate;
    ///
    /// let coord = RepoCoordinate::parse("octocat/hello-world").unwrap();
    /// assert_eq!(coord.owner, "octocat");
    /// assert_eq!(coord.repo, "hello-world");
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        // SSH format: git@github.com:owner/repo.git
        if let Some(rest) = s.strip_prefix("git@github.com:") {
            return Self::split_pair(rest.strip_suffix(".git").unwrap_or(rest));
        }

        // HTTPS format: https://github.com/owner/repo.git
        if let Some(rest) = s
            .strip_prefix("https://github.com/")
            .or_else(|| s.strip_prefix("http://github.com/"))
        {
            return Self::split_pair(rest.strip_suffix(".git").unwrap_or(rest));
        }

        // Shorthand: owner/repo
        if !s.contains("://") && !s.contains('@') && !s.contains(' ') {
            return Self::split_pair(s);
        }

        None
    }

    fn split_pair(rest: &str) -> Option<Self> {
        let parts: Vec<&str> = rest.splitn(2, '/').collect();
        if parts.len() == 2
            && !parts[0].is_empty()
            && !parts[1].is_empty()
            && !parts[1].contains('/')
        {
            Some(Self::new(parts[0], parts[1]))
        } else {
            None
        }
    }
}

impl std::fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// The Forge trait for interacting with remote hosting services.
///
/// This trait provides the abstraction layer for git-data operations.
/// v1 implements GitHub only.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
/// Implementations hold only immutable configuration (credential,
/// coordinate, base URL), so sharing one across tasks needs no locking.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `AuthRequired` / `AuthFailed`: Supply a valid token
/// - `NotFound`: Resource doesn't exist
/// - `RefUpdateRejected`: Branch tip moved or the update is forbidden
/// - `RateLimited`: Back off and retry
/// - `ApiError`: Display error message to user
/// - `NetworkError`: Check connectivity
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Get the branch's current tip commit SHA.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the branch does not exist
    async fn get_branch_ref(&self, branch: &str) -> Result<CommitSha, ForgeError>;

    /// Get commit metadata for a commit SHA, principally its root tree.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the SHA is unknown to the repository
    async fn get_commit(&self, sha: &CommitSha) -> Result<Commit, ForgeError>;

    /// Store `content` as a new blob object and return its SHA.
    ///
    /// Binary-safe: content is base64-encoded for transport. Blob creation
    /// is idempotent at the forge; identical content yields the same
    /// content-addressed SHA and duplicates do not fail.
    async fn create_blob(&self, content: &[u8]) -> Result<BlobSha, ForgeError>;

    /// Create a tree equal to `base_tree` except that `path` resolves to
    /// `blob` with regular-file mode.
    ///
    /// All other paths in the base tree are preserved unchanged; the forge's
    /// tree-merge semantics produce the copy-on-write result.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `base_tree` is invalid
    async fn create_tree(
        &self,
        base_tree: &TreeSha,
        path: &str,
        blob: &BlobSha,
    ) -> Result<TreeSha, ForgeError>;

    /// Create a commit object with exactly one parent.
    async fn create_commit(
        &self,
        message: &str,
        tree: &TreeSha,
        parent: &CommitSha,
    ) -> Result<CommitSha, ForgeError>;

    /// Move the branch's ref to point at `sha`.
    ///
    /// # Errors
    ///
    /// - `RefUpdateRejected` if the update is not a fast-forward (the tip
    ///   moved since it was read) or the branch is protected
    async fn update_branch_ref(&self, branch: &str, sha: &CommitSha) -> Result<(), ForgeError>;

    /// Get the authenticated user.
    async fn authenticated_user(&self) -> Result<User, ForgeError>;

    /// List repositories of the authenticated user.
    ///
    /// Returns at most `per_page` entries; a single page, no pagination.
    async fn list_repositories(&self, per_page: u32) -> Result<Vec<RepoSummary>, ForgeError>;
}
