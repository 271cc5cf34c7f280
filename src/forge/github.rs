//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub. All operations go
//! through the git-data REST endpoints (`git/ref`, `git/commits`,
//! `git/blobs`, `git/trees`, `git/refs`) plus the account endpoints
//! (`/user`, `/user/repos`).
//!
//! # Authentication
//!
//! A static bearer token is supplied at construction and sent on every
//! request. Token acquisition and refresh are the caller's concern.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation returns
//! `ForgeError::RateLimited` when limits are hit and does not retry.
//!
//! # Example
//!
//! ```ignore
//! use ghpush::forge::github::GitHubForge;
//! use ghpush::forge::{Forge, RepoCoordinate};
//!
//! let forge = GitHubForge::new("ghp_xxx", RepoCoordinate::new("octocat", "hello-world"));
//! let tip = forge.get_branch_ref("main").await?;
//! ```

use async_trait::async_trait;
use base64::prelude::*;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{
    BlobSha, Commit, CommitSha, FileEntry, Forge, ForgeError, RepoCoordinate, RepoSummary,
    TreeSha, User,
};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "ghpush-cli";

/// GitHub forge implementation.
///
/// Implements the `Forge` trait for GitHub using the REST API. Holds only
/// immutable configuration: the token, the repository coordinate, and the
/// API base URL (configurable for GitHub Enterprise).
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Bearer token sent on every request
    token: String,
    /// Repository coordinate (owner + repo)
    coordinate: RepoCoordinate,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &!self.token.is_empty())
            .field("coordinate", &self.coordinate)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge against the public API.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token or app token
    /// * `coordinate` - Repository owner and name
    pub fn new(token: impl Into<String>, coordinate: RepoCoordinate) -> Self {
        Self::with_api_base(token, coordinate, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token or app token
    /// * `coordinate` - Repository owner and name
    /// * `api_base` - Custom API base URL (e.g., `https://github.example.com/api/v3`)
    pub fn with_api_base(
        token: impl Into<String>,
        coordinate: RepoCoordinate,
        api_base: impl Into<String>,
    ) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            token: token.into(),
            coordinate,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Get the repository owner.
    pub fn owner(&self) -> &str {
        &self.coordinate.owner
    }

    /// Get the repository name.
    pub fn repo(&self) -> &str {
        &self.coordinate.repo
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.coordinate.owner, self.coordinate.repo, path
        )
    }

    /// Build URL for a user-scope endpoint.
    fn user_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        let message = Self::error_message(response).await;

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                ForgeError::AuthFailed(format!("Permission denied: {}", message))
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Extract the error message from a failed response body.
    async fn error_message(response: Response) -> String {
        match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        }
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_branch_ref(&self, branch: &str) -> Result<CommitSha, ForgeError> {
        let url = self.repo_url(&format!("git/ref/heads/{}", branch));

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let git_ref: GitRefResponse = self.handle_response(response).await?;
        Ok(CommitSha::new(git_ref.object.sha))
    }

    async fn get_commit(&self, sha: &CommitSha) -> Result<Commit, ForgeError> {
        let url = self.repo_url(&format!("git/commits/{}", sha));

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let commit: GitCommitResponse = self.handle_response(response).await?;
        Ok(commit.into())
    }

    async fn create_blob(&self, content: &[u8]) -> Result<BlobSha, ForgeError> {
        let url = self.repo_url("git/blobs");

        let body = CreateBlobBody {
            content: BASE64_STANDARD.encode(content),
            encoding: "base64",
        };

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let created: GitShaResponse = self.handle_response(response).await?;
        Ok(BlobSha::new(created.sha))
    }

    async fn create_tree(
        &self,
        base_tree: &TreeSha,
        path: &str,
        blob: &BlobSha,
    ) -> Result<TreeSha, ForgeError> {
        let url = self.repo_url("git/trees");

        let entry = FileEntry {
            path: path.to_string(),
            sha: blob.clone(),
        };
        let body = CreateTreeBody {
            base_tree: base_tree.as_str(),
            tree: vec![CreateTreeEntry {
                path: &entry.path,
                mode: entry.mode(),
                entry_type: "blob",
                sha: entry.sha.as_str(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let created: GitShaResponse = self.handle_response(response).await?;
        Ok(TreeSha::new(created.sha))
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &TreeSha,
        parent: &CommitSha,
    ) -> Result<CommitSha, ForgeError> {
        let url = self.repo_url("git/commits");

        let body = CreateCommitBody {
            message,
            tree: tree.as_str(),
            parents: vec![parent.as_str()],
        };

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let created: GitShaResponse = self.handle_response(response).await?;
        Ok(CommitSha::new(created.sha))
    }

    async fn update_branch_ref(&self, branch: &str, sha: &CommitSha) -> Result<(), ForgeError> {
        let url = self.repo_url(&format!("git/refs/heads/{}", branch));

        let body = UpdateRefBody { sha: sha.as_str() };

        let response = self
            .client
            .patch(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // GitHub rejects non-fast-forward updates with 422 ("Update is not
        // a fast forward") and contested updates with 409.
        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::CONFLICT {
            let message = Self::error_message(response).await;
            return Err(ForgeError::RefUpdateRejected(message));
        }

        self.handle_error_response(response, status).await
    }

    async fn authenticated_user(&self) -> Result<User, ForgeError> {
        let url = self.user_url("user");

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let user: GitHubUser = self.handle_response(response).await?;
        Ok(User {
            login: user.login,
            name: user.name,
        })
    }

    async fn list_repositories(&self, per_page: u32) -> Result<Vec<RepoSummary>, ForgeError> {
        let url = format!("{}?per_page={}", self.user_url("user/repos"), per_page);

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let repos: Vec<GitHubRepoListItem> = self.handle_response(response).await?;
        Ok(repos.into_iter().map(Into::into).collect())
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating a blob.
#[derive(Serialize)]
struct CreateBlobBody {
    content: String,
    encoding: &'static str,
}

/// Request body for creating a tree.
#[derive(Serialize)]
struct CreateTreeBody<'a> {
    base_tree: &'a str,
    tree: Vec<CreateTreeEntry<'a>>,
}

/// One changed entry in a create-tree request.
#[derive(Serialize)]
struct CreateTreeEntry<'a> {
    path: &'a str,
    mode: &'a str,
    #[serde(rename = "type")]
    entry_type: &'a str,
    sha: &'a str,
}

/// Request body for creating a commit.
#[derive(Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a str,
    parents: Vec<&'a str>,
}

/// Request body for moving a ref.
#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub get-ref response format.
#[derive(Deserialize)]
struct GitRefResponse {
    object: GitRefObject,
}

/// The object a ref points at.
#[derive(Deserialize)]
struct GitRefObject {
    sha: String,
}

/// GitHub git-commit response format.
#[derive(Deserialize)]
struct GitCommitResponse {
    sha: String,
    tree: GitTreeRef,
    #[serde(default)]
    parents: Vec<GitParentRef>,
    #[serde(default)]
    message: String,
}

/// Tree reference within a commit response.
#[derive(Deserialize)]
struct GitTreeRef {
    sha: String,
}

/// Parent reference within a commit response.
#[derive(Deserialize)]
struct GitParentRef {
    sha: String,
}

/// Response carrying just the SHA of a created object.
#[derive(Deserialize)]
struct GitShaResponse {
    sha: String,
}

/// GitHub authenticated-user response format.
#[derive(Deserialize)]
struct GitHubUser {
    login: String,
    name: Option<String>,
}

/// GitHub repository list item (subset of the full repo object).
#[derive(Deserialize)]
struct GitHubRepoListItem {
    name: String,
    full_name: String,
    private: bool,
    html_url: String,
}

impl From<GitCommitResponse> for Commit {
    fn from(c: GitCommitResponse) -> Self {
        Commit {
            sha: CommitSha::new(c.sha),
            tree: TreeSha::new(c.tree.sha),
            parents: c.parents.into_iter().map(|p| CommitSha::new(p.sha)).collect(),
            message: c.message,
        }
    }
}

impl From<GitHubRepoListItem> for RepoSummary {
    fn from(r: GitHubRepoListItem) -> Self {
        RepoSummary {
            name: r.name,
            full_name: r.full_name,
            private: r.private,
            url: r.html_url,
        }
    }
}
