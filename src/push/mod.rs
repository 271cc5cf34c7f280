//! push
//!
//! The commit pipeline: append one single-file commit to a remote branch.
//!
//! # Design
//!
//! [`CommitBuilder`] wraps a forge and a branch name and exposes
//! [`CommitBuilder::push_file`], a strict linear pipeline of six remote
//! calls:
//!
//! 1. Resolve the branch tip to a commit SHA
//! 2. Resolve that commit to its base tree SHA
//! 3. Write the file content as a blob
//! 4. Write a tree: the base tree plus one entry at the target path
//! 5. Write a commit with the new tree and the tip as its only parent
//! 6. Move the branch ref to the new commit
//!
//! Each step's output feeds the next; step *n+1* never starts before step
//! *n* resolves. There are no retries, no branching, and no rollback: a
//! failure at any step aborts the rest and surfaces as a [`PushError`]
//! naming the failed step, with the forge error as its source. Objects
//! already written stay behind as unreferenced garbage for the forge to
//! collect.
//!
//! Between steps 1 and 6 another writer may move the branch tip. That race
//! is not handled here; it surfaces as `ForgeError::RefUpdateRejected` from
//! the final step, with no retry-with-rebase.
//!
//! # Example
//!
//! ```
//! use ghpush::forge::mock::MockForge;
//! use ghpush::push::{CommitBuilder, PushRequest};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new().with_branch("main", &[("a.txt", b"alpha")]);
//! let builder = CommitBuilder::new(Box::new(forge.clone()), "main");
//!
//! let commit = builder
//!     .push_file(&PushRequest::new("b.txt", b"hi".to_vec(), "add b"))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(forge.branch_tip("main"), Some(commit));
//! assert_eq!(forge.read_file("main", "b.txt"), Some(b"hi".to_vec()));
//! # });
//! ```

use thiserror::Error;

use crate::forge::{BlobSha, Commit, CommitSha, Forge, ForgeError, TreeSha};

/// The caller-supplied unit of work: one file at one path with one commit
/// message. Stateless; one per `push_file` invocation.
#[derive(Debug, Clone)]
pub struct PushRequest {
    /// Target path within the repository tree
    pub path: String,
    /// Raw file content (binary-safe)
    pub content: Vec<u8>,
    /// Commit message
    pub message: String,
}

impl PushRequest {
    /// Create a push request.
    pub fn new(path: impl Into<String>, content: Vec<u8>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content,
            message: message.into(),
        }
    }
}

/// The six stages of the commit pipeline, in execution order.
///
/// Attached to [`PushError`] so a failure names exactly where the pipeline
/// stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStep {
    /// Resolve the branch ref to its tip commit SHA
    ResolveBranchTip,
    /// Resolve the tip commit to its base tree SHA
    ResolveBaseTree,
    /// Write the file content as a blob
    CreateBlob,
    /// Write the new tree on top of the base tree
    CreateTree,
    /// Write the new commit
    CreateCommit,
    /// Move the branch ref to the new commit
    UpdateRef,
}

impl std::fmt::Display for PushStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PushStep::ResolveBranchTip => "resolve branch tip",
            PushStep::ResolveBaseTree => "resolve base tree",
            PushStep::CreateBlob => "create blob",
            PushStep::CreateTree => "create tree",
            PushStep::CreateCommit => "create commit",
            PushStep::UpdateRef => "update ref",
        };
        write!(f, "{}", name)
    }
}

/// A pipeline failure: which step failed, and the forge error that caused
/// it, unmodified.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct PushError {
    /// The pipeline stage that failed
    pub step: PushStep,
    /// The underlying forge error, passed through
    #[source]
    pub source: ForgeError,
}

impl PushError {
    fn at(step: PushStep) -> impl FnOnce(ForgeError) -> PushError {
        move |source| PushError { step, source }
    }
}

/// Builds single-file commits on one branch of one repository.
///
/// Constructed with a forge (credential and repository coordinate live
/// inside it) and a branch name; both are held for the builder's lifetime
/// and reused across every call. The builder itself holds no mutable
/// state, so one instance can serve concurrent `push_file` calls — but
/// concurrent pushes to the same branch are not coordinated: each captures
/// its own tip, and the loser of the race gets `RefUpdateRejected`.
pub struct CommitBuilder {
    forge: Box<dyn Forge>,
    branch: String,
}

impl CommitBuilder {
    /// Create a builder for a branch.
    pub fn new(forge: Box<dyn Forge>, branch: impl Into<String>) -> Self {
        Self {
            forge,
            branch: branch.into(),
        }
    }

    /// The branch this builder commits to.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Step 1: resolve the branch's current tip commit SHA.
    pub async fn get_branch_ref(&self) -> Result<CommitSha, PushError> {
        self.forge
            .get_branch_ref(&self.branch)
            .await
            .map_err(PushError::at(PushStep::ResolveBranchTip))
    }

    /// Step 2: resolve a commit, principally for its root tree SHA.
    pub async fn get_commit(&self, sha: &CommitSha) -> Result<Commit, PushError> {
        self.forge
            .get_commit(sha)
            .await
            .map_err(PushError::at(PushStep::ResolveBaseTree))
    }

    /// Step 3: write file content as a blob.
    pub async fn create_blob(&self, content: &[u8]) -> Result<BlobSha, PushError> {
        self.forge
            .create_blob(content)
            .await
            .map_err(PushError::at(PushStep::CreateBlob))
    }

    /// Step 4: write a tree extending `base_tree` with `path` -> `blob`.
    pub async fn create_tree(
        &self,
        base_tree: &TreeSha,
        path: &str,
        blob: &BlobSha,
    ) -> Result<TreeSha, PushError> {
        self.forge
            .create_tree(base_tree, path, blob)
            .await
            .map_err(PushError::at(PushStep::CreateTree))
    }

    /// Step 5: write a commit with exactly one parent.
    pub async fn create_commit(
        &self,
        message: &str,
        tree: &TreeSha,
        parent: &CommitSha,
    ) -> Result<CommitSha, PushError> {
        self.forge
            .create_commit(message, tree, parent)
            .await
            .map_err(PushError::at(PushStep::CreateCommit))
    }

    /// Step 6: move the branch ref to the new commit.
    pub async fn update_branch_ref(&self, sha: &CommitSha) -> Result<(), PushError> {
        self.forge
            .update_branch_ref(&self.branch, sha)
            .await
            .map_err(PushError::at(PushStep::UpdateRef))
    }

    /// Commit one file to the branch.
    ///
    /// Runs the six pipeline steps in strict order, threading each step's
    /// output into the next. Returns the new commit's SHA, only after the
    /// ref update succeeds. On failure the remaining steps are skipped and
    /// the error carries the failed step plus the forge error unchanged.
    pub async fn push_file(&self, request: &PushRequest) -> Result<CommitSha, PushError> {
        let tip = self.get_branch_ref().await?;
        let base_tree = self.get_commit(&tip).await?.tree;
        let blob = self.create_blob(&request.content).await?;
        let tree = self.create_tree(&base_tree, &request.path, &blob).await?;
        let commit = self.create_commit(&request.message, &tree, &tip).await?;
        self.update_branch_ref(&commit).await?;
        Ok(commit)
    }
}
