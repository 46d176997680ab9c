//! The remote change-request collaborator for the `gst` application.
//!
//! Stack operations see the remote service through the [RemoteClient] trait;
//! [GitHubRemote] is the production implementation, backed by [octocrab].

use crate::errors::{StError, StResult};
use git2::Repository;
use octocrab::{models::IssueState, params, Octocrab};
use std::env;

/// The state of a branch's change request on the remote service, re-queried
/// on every synchronization pass and never persisted.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequestStatus {
    /// No change request has been filed for the branch.
    Absent,
    /// A change request is open. Draft requests may still have their history
    /// rewritten; non-draft requests must not.
    Open { draft: bool },
    /// The change request was merged.
    Merged,
    /// The change request was closed without merging.
    Closed,
}

/// A change request to be filed for a branch against its parent.
pub struct RequestSubmission<'a> {
    /// The branch the request is filed for.
    pub branch: &'a str,
    /// The base branch the request targets.
    pub base: &'a str,
    /// Title of the request.
    pub title: String,
    /// Body of the request.
    pub body: String,
    /// Whether the request is a draft.
    pub draft: bool,
}

/// A freshly created change request.
pub struct CreatedRequest {
    /// The number assigned by the remote service.
    pub number: u64,
    /// Browsable URL of the request, when the service provides one.
    pub url: Option<String>,
}

/// The remote change-request operations required by stack commands.
pub(crate) trait RemoteClient {
    /// Queries the current state of the change request for a branch.
    async fn request_status(&self, branch: &str) -> StResult<RequestStatus>;

    /// Files a new change request.
    async fn create_request(&self, submission: RequestSubmission<'_>) -> StResult<CreatedRequest>;
}

/// [RemoteClient] implementation for GitHub pull requests.
pub struct GitHubRemote {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubRemote {
    /// Builds a client from the `GITHUB_TOKEN` environment variable and the
    /// repository's `origin` remote URL.
    pub fn from_env(repository: &Repository) -> StResult<Self> {
        let token = env::var("GITHUB_TOKEN").map_err(|_| StError::MissingGitHubToken)?;
        let client = Octocrab::builder().personal_token(token).build()?;
        let (owner, repo) = owner_and_repository(repository)?;

        Ok(Self {
            client,
            owner,
            repo,
        })
    }
}

impl RemoteClient for GitHubRemote {
    async fn request_status(&self, branch: &str) -> StResult<RequestStatus> {
        // The most recently created pull request for the branch is the
        // authoritative one.
        let page = self
            .client
            .pulls(&self.owner, &self.repo)
            .list()
            .state(params::State::All)
            .head(format!("{}:{}", self.owner, branch))
            .per_page(1)
            .send()
            .await?;

        let Some(pull_request) = page.items.into_iter().next() else {
            return Ok(RequestStatus::Absent);
        };

        match pull_request.state {
            Some(IssueState::Open) => Ok(RequestStatus::Open {
                draft: pull_request.draft.unwrap_or(false),
            }),
            Some(IssueState::Closed) => {
                if pull_request.merged_at.is_some() {
                    Ok(RequestStatus::Merged)
                } else {
                    Ok(RequestStatus::Closed)
                }
            }
            Some(other) => Err(StError::UnhandledRequestState(format!("{other:?}"))),
            None => Err(StError::UnhandledRequestState("<missing>".to_string())),
        }
    }

    async fn create_request(&self, submission: RequestSubmission<'_>) -> StResult<CreatedRequest> {
        let pull_request = self
            .client
            .pulls(&self.owner, &self.repo)
            .create(submission.title.as_str(), submission.branch, submission.base)
            .body(submission.body.as_str())
            .draft(submission.draft)
            .send()
            .await?;

        Ok(CreatedRequest {
            number: pull_request.number,
            url: pull_request.html_url.map(|url| url.to_string()),
        })
    }
}

/// Parses the `owner` and `repository` segments out of the `origin` remote URL.
pub(crate) fn owner_and_repository(repository: &Repository) -> StResult<(String, String)> {
    let remote = repository.find_remote("origin")?;
    let url = remote
        .url()
        .ok_or_else(|| StError::RemoteUrlUnsupported("<non-utf8>".to_string()))?;
    parse_github_url(url).ok_or_else(|| StError::RemoteUrlUnsupported(url.to_string()))
}

/// Parses both SSH (`git@github.com:owner/repo.git`) and HTTPS
/// (`https://github.com/owner/repo`) GitHub remote URLs.
fn parse_github_url(url: &str) -> Option<(String, String)> {
    let trimmed = url.strip_suffix(".git").unwrap_or(url);
    let (_, path) = trimmed.split_once("github.com")?;
    let path = path.trim_start_matches(|c| c == ':' || c == '/');
    let (owner, repo) = path.split_once('/')?;

    (!owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
        .then(|| (owner.to_string(), repo.to_string()))
}


#[cfg(test)]
mod test {
    use super::parse_github_url;

    #[test]
    fn parses_ssh_remote_url() {
        assert_eq!(
            parse_github_url("git@github.com:octocat/stacks.git"),
            Some(("octocat".to_string(), "stacks".to_string()))
        );
    }

    #[test]
    fn parses_https_remote_url() {
        assert_eq!(
            parse_github_url("https://github.com/octocat/stacks"),
            Some(("octocat".to_string(), "stacks".to_string()))
        );
    }

    #[test]
    fn rejects_foreign_remote_url() {
        assert_eq!(parse_github_url("https://example.com/octocat/stacks"), None);
    }
}
