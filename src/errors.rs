//! Error types for the `gst` application.

use nu_ansi_term::Color;
use thiserror::Error;

/// Errors that can occur while running `gst`.
#[derive(Error, Debug)]
pub enum StError {
    /// None of the trunk candidates exist as a local branch.
    #[error("No valid trunk branch found. Create a `main` or `master` branch first.")]
    NoValidTrunk,
    /// The branch is not tracked with `gst`.
    #[error("Branch `{}` is not tracked with `gst`. Track it first with `gst track <parent>`.", Color::Blue.paint(.0))]
    BranchNotTracked(String),
    /// The branch does not exist in the local repository.
    #[error("Branch `{}` does not exist.", Color::Blue.paint(.0))]
    BranchNotFound(String),
    /// A branch cannot be its own parent.
    #[error("Branch `{}` cannot be its own parent.", Color::Blue.paint(.0))]
    SelfParent(String),
    /// The trunk branch cannot be tracked against a parent.
    #[error("The trunk branch cannot have a parent.")]
    TrunkCannotHaveParent,
    /// Tracking the branch against the parent would create a cycle.
    #[error("Cannot track `{}` against `{}`; the parent is a descendant of the branch.", Color::Blue.paint(.branch), Color::Blue.paint(.parent))]
    CycleDetected {
        branch: String,
        parent: String,
    },
    /// The branch has no children to switch to.
    #[error("Branch `{}` has no children.", Color::Blue.paint(.0))]
    NoChildren(String),
    /// An enumerated selection was out of range.
    #[error("Selection {index} is out of range; expected a value below {count}.")]
    InvalidSelection {
        index: usize,
        count: usize,
    },
    /// The remote service reported a request state this version does not know.
    #[error("Unhandled change request state `{}`. The remote service contract may have changed.", .0)]
    UnhandledRequestState(String),
    /// The `GITHUB_TOKEN` environment variable is not set.
    #[error("The `GITHUB_TOKEN` environment variable must be set.")]
    MissingGitHubToken,
    /// The `origin` remote URL could not be parsed as a GitHub repository.
    #[error("Remote URL `{}` is not a recognized GitHub repository URL.", .0)]
    RemoteUrlUnsupported(String),
    /// `HEAD` does not point to a named local branch.
    #[error("HEAD does not point to a local branch.")]
    HeadNameInvalid,
    /// The repository has no working directory to anchor the state file.
    #[error("Repository has no working directory; bare repositories are not supported.")]
    StorePathNotFound,
    /// An external `git` command exited with a failure status.
    #[error("External command failed: `{}`. Resolve the failure and re-run.", .0)]
    CommandFailed(String),
    /// A [git2::Error] occurred.
    #[error("libgit2 error: {}", .0)]
    Git2(#[from] git2::Error),
    /// An [octocrab::Error] occurred.
    #[error("GitHub API error: {}", .0)]
    GitHub(#[from] octocrab::Error),
    /// An [inquire::InquireError] occurred.
    #[error("inquire error: {}", .0)]
    Inquire(#[from] inquire::InquireError),
    /// A [serde_json::Error] occurred while reading or writing the state file.
    #[error("State file serialization error: {}", .0)]
    Serde(#[from] serde_json::Error),
    /// An [std::io::Error] occurred.
    #[error("I/O error: {}", .0)]
    Io(#[from] std::io::Error),
    /// A [std::fmt::Error] occurred while rendering output.
    #[error("Formatting error: {}", .0)]
    Fmt(#[from] std::fmt::Error),
}

/// Result alias for fallible `gst` operations.
pub type StResult<T> = Result<T, StError>;
