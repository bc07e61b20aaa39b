//! Error types shared by the providers, the transfer engine and the migrator.

use thiserror::Error;

use crate::git::TransportError;

/// Failures that can end a single repository migration or, for listing and
/// client construction, the whole run.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Bitbucket API error: {0}")]
    Source(#[from] reqwest::Error),

    #[error("GitHub API error: {0}")]
    Target(#[from] octocrab::Error),

    #[error("Repository `{0}` already exists on the target")]
    RepositoryAlreadyExists(String),

    #[error("No http clone link found for repository `{repository}` in project `{project}`")]
    MissingCloneLink { project: String, repository: String },

    #[error("Transfer of `{repository}` failed: {source}")]
    Transfer {
        repository: String,
        #[source]
        source: TransferError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failures raised while cloning or pushing a single repository.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Local clone at `{path}` is unusable: {source}")]
    LocalClone {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    pub fn is_transient(&self) -> bool {
        match self {
            TransferError::Transport(error) => error.transient,
            TransferError::LocalClone { .. } => false,
        }
    }
}
