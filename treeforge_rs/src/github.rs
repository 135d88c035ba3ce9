//! GitHub repository listing.
//!
//! A thin blocking client over the two REST endpoints the formatter
//! needs: the branch list and the recursive Git Trees API (one request
//! for the whole repository instead of crawling the contents endpoint).
//! Everything downstream is the ordinary node model.

use std::time::Duration;

use serde::Deserialize;

use crate::types::{BranchInfo, EntryKind, RemoteEntry};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Error type for GitHub operations
#[derive(Debug)]
pub enum GithubError {
    /// Primary rate limit exhausted (anonymous requests hit this fast)
    RateLimited,
    /// Repository, branch, or path does not exist
    NotFound(String),
    /// The API answered with an error payload
    Api(String),
    /// Transport-level failure
    Http(reqwest::Error),
}

impl std::fmt::Display for GithubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GithubError::RateLimited => {
                write!(
                    f,
                    "GitHub API rate limit exceeded; set GITHUB_TOKEN to raise the limit"
                )
            }
            GithubError::NotFound(what) => {
                write!(f, "repository or branch not found: {}", what)
            }
            GithubError::Api(msg) => {
                write!(f, "GitHub API error: {}", msg)
            }
            GithubError::Http(e) => {
                write!(f, "request failed: {}", e)
            }
        }
    }
}

impl std::error::Error for GithubError {}

impl From<reqwest::Error> for GithubError {
    fn from(e: reqwest::Error) -> Self {
        GithubError::Http(e)
    }
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Deserialize)]
struct RawBranch {
    name: String,
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    truncated: bool,
    tree: Vec<TreeItem>,
}

#[derive(Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Blocking GitHub API client.
pub struct GithubClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Result<Self, GithubError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("treeforge/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            token,
        })
    }

    /// Point the client at a different API root (tests, GH Enterprise).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// List branches, with the repository's default branch marked.
    pub fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<BranchInfo>, GithubError> {
        let repo_url = format!(
            "{}/repos/{}/{}",
            self.api_base,
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );
        let info: RepoInfo = self.get(&repo_url)?.json()?;

        let branches_url = format!("{}/branches?per_page=100", repo_url);
        let branches: Vec<RawBranch> = self.get(&branches_url)?.json()?;

        Ok(branches
            .into_iter()
            .map(|b| BranchInfo {
                is_default: b.name == info.default_branch,
                name: b.name,
            })
            .collect())
    }

    /// Fetch the full repository tree at `reference` as a flat listing.
    ///
    /// `path_filter` keeps only entries under that subpath, re-rooted
    /// relative to it. Submodule entries are dropped.
    pub fn repo_tree(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        path_filter: Option<&str>,
    ) -> Result<Vec<RemoteEntry>, GithubError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            urlencoding::encode(reference)
        );
        let response: TreeResponse = self.get(&url)?.json()?;

        if response.truncated {
            eprintln!(
                "[treeforge][warn] repository tree was truncated by the GitHub API; output may be incomplete"
            );
        }

        let entries: Vec<RemoteEntry> = response
            .tree
            .into_iter()
            .filter_map(|item| {
                let kind = match item.kind.as_str() {
                    "blob" => EntryKind::File,
                    "tree" => EntryKind::Dir,
                    _ => return None,
                };
                Some(RemoteEntry {
                    path: item.path,
                    kind,
                })
            })
            .collect();

        Ok(match path_filter {
            Some(prefix) => filter_entries_by_path(entries, prefix),
            None => entries,
        })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, GithubError> {
        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if status.as_u16() == 404 {
            return Err(GithubError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            if message.to_lowercase().contains("rate limit") {
                return Err(GithubError::RateLimited);
            }
            return Err(GithubError::Api(message));
        }
        Ok(response)
    }
}

/// Keep only entries under `prefix`, re-rooted relative to it. The
/// prefix directory itself is dropped; it becomes the conceptual root.
pub fn filter_entries_by_path(entries: Vec<RemoteEntry>, prefix: &str) -> Vec<RemoteEntry> {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return entries;
    }
    let with_slash = format!("{}/", prefix);

    entries
        .into_iter()
        .filter_map(|mut entry| {
            let rest = entry.path.strip_prefix(&with_slash)?;
            if rest.is_empty() {
                return None;
            }
            entry.path = rest.to_string();
            Some(entry)
        })
        .collect()
}
