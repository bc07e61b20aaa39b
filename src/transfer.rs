//! Clone-or-reuse-then-push transfer of one repository.
//!
//! A non-empty local clone left behind by an earlier run is reused as is and
//! only pushed; otherwise the source is cloned, its remote is swapped for the
//! destination and every local branch is pushed.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::cli::Credentials;
use crate::error::TransferError;
use crate::git::{Branch, GitTransport};
use crate::retry::{with_retry, RetryPolicy, DEFAULT_DELAY_UNIT};

const REMOTE: &str = "origin";

/// State of the working copy at the start of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCloneState {
    /// Missing or empty directory.
    Absent,
    PresentNonEmpty,
}

impl LocalCloneState {
    pub async fn probe(path: &Path) -> Result<Self, TransferError> {
        let mut entries = match tokio::fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::Absent),
            Err(error) => return Err(local_clone_error(path, error)),
        };

        match entries.next_entry().await {
            Ok(Some(_)) => Ok(Self::PresentNonEmpty),
            Ok(None) => Ok(Self::Absent),
            Err(error) => Err(local_clone_error(path, error)),
        }
    }
}

fn local_clone_error(path: &Path, source: std::io::Error) -> TransferError {
    TransferError::LocalClone {
        path: path.display().to_string(),
        source,
    }
}

/// How a transfer was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Fresh,
    Resumed,
}

#[derive(Debug, Clone)]
pub struct TransferRequest<'a> {
    pub source_url: &'a str,
    pub destination_url: &'a str,
    pub local_path: &'a Path,
    pub source_credentials: &'a Credentials,
    pub destination_credentials: &'a Credentials,
}

pub struct TransferEngine<G> {
    transport: G,
    delay_unit: Duration,
}

impl<G: GitTransport> TransferEngine<G> {
    pub fn new(transport: G) -> Self {
        Self {
            transport,
            delay_unit: DEFAULT_DELAY_UNIT,
        }
    }

    /// Changes the base unit of the retry backoff.
    pub fn with_delay_unit(mut self, delay_unit: Duration) -> Self {
        self.delay_unit = delay_unit;
        self
    }

    pub fn transport(&self) -> &G {
        &self.transport
    }

    pub async fn transfer(&self, request: &TransferRequest<'_>) -> Result<TransferMode, TransferError> {
        match LocalCloneState::probe(request.local_path).await? {
            LocalCloneState::PresentNonEmpty => {
                info!(path = %request.local_path.display(), "reusing existing local clone");
                self.resume(request).await?;
                Ok(TransferMode::Resumed)
            }
            LocalCloneState::Absent => {
                self.fresh(request).await?;
                Ok(TransferMode::Fresh)
            }
        }
    }

    async fn resume(&self, request: &TransferRequest<'_>) -> Result<(), TransferError> {
        let branches = self.transport.local_branches(request.local_path).await?;

        self.push(
            request,
            request.destination_url,
            &branches,
            RetryPolicy::push_on_resume(self.delay_unit),
        )
        .await
    }

    async fn fresh(&self, request: &TransferRequest<'_>) -> Result<(), TransferError> {
        let path = request.local_path;

        with_retry(
            || async {
                self.transport
                    .clone_repository(request.source_url, path, request.source_credentials)
                    .await
                    .map_err(TransferError::from)
            },
            RetryPolicy::clone_repository(self.delay_unit),
            &format!("clone of {}", request.source_url),
        )
        .await?;

        self.transport.track_remote_branches(path, REMOTE).await?;
        self.transport.remove_remote(path, REMOTE).await?;
        self.transport
            .add_remote(path, REMOTE, request.destination_url)
            .await?;

        let branches = self.transport.local_branches(path).await?;
        for branch in &branches {
            self.transport
                .set_upstream(path, branch, REMOTE, &branch.canonical_name)
                .await?;
        }

        self.push(
            request,
            REMOTE,
            &branches,
            RetryPolicy::push_after_clone(self.delay_unit),
        )
        .await
    }

    async fn push(
        &self,
        request: &TransferRequest<'_>,
        remote: &str,
        branches: &[Branch],
        policy: RetryPolicy,
    ) -> Result<(), TransferError> {
        if branches.is_empty() {
            warn!(path = %request.local_path.display(), "no local branches, nothing to push");
            return Ok(());
        }

        with_retry(
            || async {
                self.transport
                    .push(
                        request.local_path,
                        remote,
                        branches,
                        request.destination_credentials,
                    )
                    .await
                    .map_err(TransferError::from)
            },
            policy,
            &format!("push to {}", request.destination_url),
        )
        .await
    }
}
