//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge`
//! trait for use in tests. It stores blobs, trees, commits, and branch refs
//! in memory and allows configuring failure scenarios.
//!
//! Objects are genuinely content-addressed (sha2 over the object payload),
//! so blob creation is idempotent exactly as it is on the real forge:
//! identical content yields the same SHA. Ref updates enforce fast-forward
//! semantics: an update is rejected unless the new commit descends from the
//! current tip.
//!
//! # Example
//!
//! ```
//! use ghpush::forge::mock::MockForge;
//! use ghpush::forge::Forge;
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new().with_branch("main", &[("a.txt", b"alpha")]);
//!
//! let tip = forge.get_branch_ref("main").await.unwrap();
//! let commit = forge.get_commit(&tip).await.unwrap();
//!
//! let blob = forge.create_blob(b"hello").await.unwrap();
//! let tree = forge.create_tree(&commit.tree, "b.txt", &blob).await.unwrap();
//! let new_commit = forge.create_commit("add b", &tree, &tip).await.unwrap();
//! forge.update_branch_ref("main", &new_commit).await.unwrap();
//!
//! assert_eq!(forge.read_file("main", "b.txt"), Some(b"hello".to_vec()));
//! # });
//! ```

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use super::traits::{
    BlobSha, Commit, CommitSha, Forge, ForgeError, RepoSummary, TreeSha, User,
};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockForgeInner {
    /// Blob content by SHA.
    blobs: HashMap<BlobSha, Vec<u8>>,
    /// Tree entries (path -> blob) by SHA.
    trees: HashMap<TreeSha, BTreeMap<String, BlobSha>>,
    /// Commits by SHA.
    commits: HashMap<CommitSha, Commit>,
    /// Branch refs (branch name -> tip commit).
    refs: HashMap<String, CommitSha>,
    /// The authenticated user.
    user: User,
    /// Repositories of the authenticated user.
    repos: Vec<RepoSummary>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail get_branch_ref with the given error.
    GetBranchRef(ForgeError),
    /// Fail get_commit with the given error.
    GetCommit(ForgeError),
    /// Fail create_blob with the given error.
    CreateBlob(ForgeError),
    /// Fail create_tree with the given error.
    CreateTree(ForgeError),
    /// Fail create_commit with the given error.
    CreateCommit(ForgeError),
    /// Fail update_branch_ref with the given error.
    UpdateBranchRef(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone)]
pub enum MockOperation {
    GetBranchRef {
        branch: String,
    },
    GetCommit {
        sha: CommitSha,
    },
    CreateBlob {
        content: Vec<u8>,
    },
    CreateTree {
        base_tree: TreeSha,
        path: String,
        blob: BlobSha,
    },
    CreateCommit {
        message: String,
        tree: TreeSha,
        parent: CommitSha,
    },
    UpdateBranchRef {
        branch: String,
        sha: CommitSha,
    },
    AuthenticatedUser,
    ListRepositories {
        per_page: u32,
    },
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForgeInner {
                blobs: HashMap::new(),
                trees: HashMap::new(),
                commits: HashMap::new(),
                refs: HashMap::new(),
                user: User {
                    login: "mock-user".to_string(),
                    name: Some("Mock User".to_string()),
                },
                repos: Vec::new(),
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Seed a branch whose root commit contains the given files.
    ///
    /// # Example
    ///
    /// ```
    /// use ghpush::forge::mock::MockForge;
    ///
    /// let forge = MockForge::new()
    ///     .with_branch("main", &[("a.txt", b"alpha" as &[u8])]);
    ///
    /// assert!(forge.branch_tip("main").is_some());
    /// ```
    pub fn with_branch(self, branch: &str, files: &[(&str, &[u8])]) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let mut entries = BTreeMap::new();
            for (path, content) in files {
                let blob = inner.store_blob(content.to_vec());
                entries.insert(path.to_string(), blob);
            }
            let tree = inner.store_tree(entries);
            let commit = inner.store_commit("seed".to_string(), tree, Vec::new());
            inner.refs.insert(branch.to_string(), commit);
        }
        self
    }

    /// Set the authenticated user returned by `authenticated_user`.
    pub fn with_user(self, login: &str, name: Option<&str>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.user = User {
                login: login.to_string(),
                name: name.map(|n| n.to_string()),
            };
        }
        self
    }

    /// Seed the repository list returned by `list_repositories`.
    pub fn with_repositories(self, repos: Vec<RepoSummary>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.repos = repos;
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use ghpush::forge::mock::{FailOn, MockForge};
    /// use ghpush::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreateBlob(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    ///
    /// Useful for verifying call order and arguments.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Get a branch's tip (for test verification).
    pub fn branch_tip(&self, branch: &str) -> Option<CommitSha> {
        let inner = self.inner.lock().unwrap();
        inner.refs.get(branch).cloned()
    }

    /// Get a commit by SHA (for test verification).
    pub fn commit(&self, sha: &CommitSha) -> Option<Commit> {
        let inner = self.inner.lock().unwrap();
        inner.commits.get(sha).cloned()
    }

    /// Get a tree's entries (for test verification).
    pub fn tree_entries(&self, sha: &TreeSha) -> Option<BTreeMap<String, BlobSha>> {
        let inner = self.inner.lock().unwrap();
        inner.trees.get(sha).cloned()
    }

    /// Get a blob's content (for test verification).
    pub fn blob_content(&self, sha: &BlobSha) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        inner.blobs.get(sha).cloned()
    }

    /// Resolve `path` on `branch` through ref, commit, and tree to its
    /// blob content (for test verification).
    pub fn read_file(&self, branch: &str, path: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        let tip = inner.refs.get(branch)?;
        let commit = inner.commits.get(tip)?;
        let entries = inner.trees.get(&commit.tree)?;
        let blob = entries.get(path)?;
        inner.blobs.get(blob).cloned()
    }

    /// Total number of commit objects stored.
    pub fn commit_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.commits.len()
    }

    /// Total number of blob objects stored.
    pub fn blob_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.blobs.len()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail<T>(&self, expected: &str) -> Option<Result<T, ForgeError>> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::GetBranchRef(e)) if expected == "get_branch_ref" => Some(Err(e.clone())),
            Some(FailOn::GetCommit(e)) if expected == "get_commit" => Some(Err(e.clone())),
            Some(FailOn::CreateBlob(e)) if expected == "create_blob" => Some(Err(e.clone())),
            Some(FailOn::CreateTree(e)) if expected == "create_tree" => Some(Err(e.clone())),
            Some(FailOn::CreateCommit(e)) if expected == "create_commit" => Some(Err(e.clone())),
            Some(FailOn::UpdateBranchRef(e)) if expected == "update_branch_ref" => {
                Some(Err(e.clone()))
            }
            _ => None,
        }
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForgeInner {
    /// Store a blob, returning its content-addressed SHA.
    fn store_blob(&mut self, content: Vec<u8>) -> BlobSha {
        let sha = BlobSha::new(object_sha("blob", &content));
        self.blobs.insert(sha.clone(), content);
        sha
    }

    /// Store a tree, returning its content-addressed SHA.
    fn store_tree(&mut self, entries: BTreeMap<String, BlobSha>) -> TreeSha {
        let mut payload = Vec::new();
        for (path, blob) in &entries {
            payload.extend_from_slice(path.as_bytes());
            payload.push(0);
            payload.extend_from_slice(blob.as_str().as_bytes());
            payload.push(b'\n');
        }
        let sha = TreeSha::new(object_sha("tree", &payload));
        self.trees.insert(sha.clone(), entries);
        sha
    }

    /// Store a commit, returning its content-addressed SHA.
    fn store_commit(
        &mut self,
        message: String,
        tree: TreeSha,
        parents: Vec<CommitSha>,
    ) -> CommitSha {
        let mut payload = Vec::new();
        payload.extend_from_slice(tree.as_str().as_bytes());
        payload.push(b'\n');
        for parent in &parents {
            payload.extend_from_slice(parent.as_str().as_bytes());
            payload.push(b'\n');
        }
        payload.extend_from_slice(message.as_bytes());

        let sha = CommitSha::new(object_sha("commit", &payload));
        self.commits.insert(
            sha.clone(),
            Commit {
                sha: sha.clone(),
                tree,
                parents,
                message,
            },
        );
        sha
    }
}

/// Hash an object payload with a kind prefix, like git's object headers.
fn object_sha(kind: &str, payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update([0u8]);
    hasher.update(payload);
    hex::encode(&hasher.finalize()[..20])
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_branch_ref(&self, branch: &str) -> Result<CommitSha, ForgeError> {
        self.record(MockOperation::GetBranchRef {
            branch: branch.to_string(),
        });

        if let Some(result) = self.check_fail("get_branch_ref") {
            return result;
        }

        let inner = self.inner.lock().unwrap();
        inner
            .refs
            .get(branch)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("branch '{}'", branch)))
    }

    async fn get_commit(&self, sha: &CommitSha) -> Result<Commit, ForgeError> {
        self.record(MockOperation::GetCommit { sha: sha.clone() });

        if let Some(result) = self.check_fail("get_commit") {
            return result;
        }

        let inner = self.inner.lock().unwrap();
        inner
            .commits
            .get(sha)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("commit {}", sha)))
    }

    async fn create_blob(&self, content: &[u8]) -> Result<BlobSha, ForgeError> {
        self.record(MockOperation::CreateBlob {
            content: content.to_vec(),
        });

        if let Some(result) = self.check_fail("create_blob") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        Ok(inner.store_blob(content.to_vec()))
    }

    async fn create_tree(
        &self,
        base_tree: &TreeSha,
        path: &str,
        blob: &BlobSha,
    ) -> Result<TreeSha, ForgeError> {
        self.record(MockOperation::CreateTree {
            base_tree: base_tree.clone(),
            path: path.to_string(),
            blob: blob.clone(),
        });

        if let Some(result) = self.check_fail("create_tree") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        let mut entries = inner
            .trees
            .get(base_tree)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("tree {}", base_tree)))?;

        entries.insert(path.to_string(), blob.clone());
        Ok(inner.store_tree(entries))
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &TreeSha,
        parent: &CommitSha,
    ) -> Result<CommitSha, ForgeError> {
        self.record(MockOperation::CreateCommit {
            message: message.to_string(),
            tree: tree.clone(),
            parent: parent.clone(),
        });

        if let Some(result) = self.check_fail("create_commit") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        if !inner.trees.contains_key(tree) {
            return Err(ForgeError::NotFound(format!("tree {}", tree)));
        }
        if !inner.commits.contains_key(parent) {
            return Err(ForgeError::NotFound(format!("commit {}", parent)));
        }

        Ok(inner.store_commit(message.to_string(), tree.clone(), vec![parent.clone()]))
    }

    async fn update_branch_ref(&self, branch: &str, sha: &CommitSha) -> Result<(), ForgeError> {
        self.record(MockOperation::UpdateBranchRef {
            branch: branch.to_string(),
            sha: sha.clone(),
        });

        if let Some(result) = self.check_fail::<()>("update_branch_ref") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        let commit = inner
            .commits
            .get(sha)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("commit {}", sha)))?;

        let tip = inner
            .refs
            .get(branch)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("branch '{}'", branch)))?;

        // Fast-forward only: the new commit must sit directly on the
        // current tip. Sufficient for the single-parent chains this
        // client produces.
        if *sha != tip && !commit.parents.contains(&tip) {
            return Err(ForgeError::RefUpdateRejected(
                "Update is not a fast forward".to_string(),
            ));
        }

        inner.refs.insert(branch.to_string(), sha.clone());
        Ok(())
    }

    async fn authenticated_user(&self) -> Result<User, ForgeError> {
        self.record(MockOperation::AuthenticatedUser);

        let inner = self.inner.lock().unwrap();
        Ok(inner.user.clone())
    }

    async fn list_repositories(&self, per_page: u32) -> Result<Vec<RepoSummary>, ForgeError> {
        self.record(MockOperation::ListRepositories { per_page });

        let inner = self.inner.lock().unwrap();
        Ok(inner.repos.iter().take(per_page as usize).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_branch_seeds_resolvable_state() {
        let forge = MockForge::new().with_branch("main", &[("a.txt", b"alpha")]);

        let tip = forge.get_branch_ref("main").await.unwrap();
        let commit = forge.get_commit(&tip).await.unwrap();
        assert!(commit.parents.is_empty());

        let entries = forge.tree_entries(&commit.tree).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(forge.read_file("main", "a.txt"), Some(b"alpha".to_vec()));
    }

    #[tokio::test]
    async fn get_branch_ref_unknown_branch_fails() {
        let forge = MockForge::new();

        let result = forge.get_branch_ref("missing").await;
        assert!(matches!(result, Err(ForgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_blob_is_content_addressed() {
        let forge = MockForge::new();

        let first = forge.create_blob(b"same bytes").await.unwrap();
        let second = forge.create_blob(b"same bytes").await.unwrap();
        let other = forge.create_blob(b"other bytes").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(forge.blob_count(), 2);
    }

    #[tokio::test]
    async fn create_tree_preserves_base_entries() {
        let forge = MockForge::new().with_branch("main", &[("a.txt", b"alpha")]);

        let tip = forge.get_branch_ref("main").await.unwrap();
        let base = forge.get_commit(&tip).await.unwrap().tree;

        let blob = forge.create_blob(b"beta").await.unwrap();
        let tree = forge.create_tree(&base, "b.txt", &blob).await.unwrap();

        let entries = forge.tree_entries(&tree).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains_key("a.txt"));
        assert_eq!(entries.get("b.txt"), Some(&blob));

        // Base tree is untouched
        let base_entries = forge.tree_entries(&base).unwrap();
        assert_eq!(base_entries.len(), 1);
    }

    #[tokio::test]
    async fn create_tree_unknown_base_fails() {
        let forge = MockForge::new();
        let blob = forge.create_blob(b"x").await.unwrap();

        let result = forge
            .create_tree(&TreeSha::new("does-not-exist"), "x.txt", &blob)
            .await;
        assert!(matches!(result, Err(ForgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_commit_records_single_parent() {
        let forge = MockForge::new().with_branch("main", &[("a.txt", b"alpha")]);

        let tip = forge.get_branch_ref("main").await.unwrap();
        let base = forge.get_commit(&tip).await.unwrap().tree;
        let blob = forge.create_blob(b"beta").await.unwrap();
        let tree = forge.create_tree(&base, "b.txt", &blob).await.unwrap();

        let sha = forge.create_commit("add b", &tree, &tip).await.unwrap();
        let commit = forge.get_commit(&sha).await.unwrap();

        assert_eq!(commit.parents, vec![tip]);
        assert_eq!(commit.message, "add b");
        assert_eq!(commit.tree, tree);
    }

    #[tokio::test]
    async fn update_branch_ref_fast_forward_succeeds() {
        let forge = MockForge::new().with_branch("main", &[("a.txt", b"alpha")]);

        let tip = forge.get_branch_ref("main").await.unwrap();
        let base = forge.get_commit(&tip).await.unwrap().tree;
        let blob = forge.create_blob(b"beta").await.unwrap();
        let tree = forge.create_tree(&base, "b.txt", &blob).await.unwrap();
        let new_commit = forge.create_commit("add b", &tree, &tip).await.unwrap();

        forge.update_branch_ref("main", &new_commit).await.unwrap();
        assert_eq!(forge.branch_tip("main"), Some(new_commit));
    }

    #[tokio::test]
    async fn update_branch_ref_rejects_non_fast_forward() {
        let forge = MockForge::new().with_branch("main", &[("a.txt", b"alpha")]);

        let old_tip = forge.get_branch_ref("main").await.unwrap();
        let base = forge.get_commit(&old_tip).await.unwrap().tree;

        // Another writer moves the tip first
        let blob1 = forge.create_blob(b"first").await.unwrap();
        let tree1 = forge.create_tree(&base, "first.txt", &blob1).await.unwrap();
        let winner = forge.create_commit("first", &tree1, &old_tip).await.unwrap();
        forge.update_branch_ref("main", &winner).await.unwrap();

        // A commit still parented on the old tip no longer fast-forwards
        let blob2 = forge.create_blob(b"second").await.unwrap();
        let tree2 = forge
            .create_tree(&base, "second.txt", &blob2)
            .await
            .unwrap();
        let loser = forge.create_commit("second", &tree2, &old_tip).await.unwrap();

        let result = forge.update_branch_ref("main", &loser).await;
        assert!(matches!(result, Err(ForgeError::RefUpdateRejected(_))));

        // Tip is unchanged
        assert_eq!(forge.branch_tip("main"), Some(winner));
    }

    #[tokio::test]
    async fn fail_on_create_blob() {
        let forge = MockForge::new().fail_on(FailOn::CreateBlob(ForgeError::RateLimited));

        let result = forge.create_blob(b"x").await;
        assert!(matches!(result, Err(ForgeError::RateLimited)));
    }

    #[tokio::test]
    async fn clear_fail_on_restores_success() {
        let forge = MockForge::new().fail_on(FailOn::CreateBlob(ForgeError::RateLimited));

        assert!(forge.create_blob(b"x").await.is_err());
        forge.clear_fail_on();
        assert!(forge.create_blob(b"x").await.is_ok());
    }

    #[tokio::test]
    async fn operations_recorded_in_order() {
        let forge = MockForge::new().with_branch("main", &[]);

        forge.get_branch_ref("main").await.unwrap();
        forge.create_blob(b"x").await.unwrap();

        let ops = forge.operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], MockOperation::GetBranchRef { .. }));
        assert!(matches!(ops[1], MockOperation::CreateBlob { .. }));
    }

    #[tokio::test]
    async fn authenticated_user_returns_seeded_user() {
        let forge = MockForge::new().with_user("octocat", Some("The Octocat"));

        let user = forge.authenticated_user().await.unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
    }

    #[tokio::test]
    async fn list_repositories_honors_per_page() {
        let repos: Vec<RepoSummary> = (0..5)
            .map(|i| RepoSummary {
                name: format!("repo-{}", i),
                full_name: format!("octocat/repo-{}", i),
                private: false,
                url: format!("https://github.com/octocat/repo-{}", i),
            })
            .collect();
        let forge = MockForge::new().with_repositories(repos);

        let listed = forge.list_repositories(3).await.unwrap();
        assert_eq!(listed.len(), 3);
    }

    #[test]
    fn forge_name() {
        let forge = MockForge::new();
        assert_eq!(forge.name(), "mock");
    }
}
