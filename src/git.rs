//! Git transport used by the transfer engine.
//!
//! [`GitTransport`] is the seam between the transfer engine and git itself.
//! [`CommandGitTransport`] drives the system `git` binary through
//! [`tokio::process::Command`]; credentials are injected per invocation as an
//! `http.extraHeader` so they never end up in remote URLs or `.git/config`.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::cli::Credentials;

/// Message fragments that mark a failure as a transient transport problem
/// (TLS handshake flakiness) rather than a permanent one.
const TRANSIENT_MARKERS: &[&str] = &[
    "secure connection",
    "gnutls_handshake",
    "ssl_connect",
    "ssl/tls connection failed",
    "tls connection was non-properly terminated",
];

/// A failed git operation.
///
/// `transient` is set when the failure is worth retrying.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("git {operation} failed: {message}")]
pub struct TransportError {
    pub operation: &'static str,
    pub message: String,
    pub transient: bool,
}

impl TransportError {
    /// Wraps an unstructured failure message, classifying it by content.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        let transient = is_secure_connection_failure(&message);
        Self {
            operation,
            message,
            transient,
        }
    }

    pub fn transient(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            transient: true,
        }
    }

    pub fn permanent(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            transient: false,
        }
    }
}

fn is_secure_connection_failure(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// A local branch of a working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Short name, e.g. `main`.
    pub name: String,
    /// Full ref name, e.g. `refs/heads/main`.
    pub canonical_name: String,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let canonical_name = format!("refs/heads/{}", name);
        Self {
            name,
            canonical_name,
        }
    }

    fn refspec(&self) -> String {
        format!("{0}:{0}", self.canonical_name)
    }
}

#[async_trait]
pub trait GitTransport: Send + Sync {
    /// Clones `url` into `dest`, authenticating with `credentials`.
    async fn clone_repository(
        &self,
        url: &str,
        dest: &Path,
        credentials: &Credentials,
    ) -> Result<(), TransportError>;

    /// Creates a local branch for every branch of `remote` that has none yet.
    async fn track_remote_branches(&self, repo: &Path, remote: &str)
        -> Result<(), TransportError>;

    async fn remove_remote(&self, repo: &Path, name: &str) -> Result<(), TransportError>;

    async fn add_remote(&self, repo: &Path, name: &str, url: &str) -> Result<(), TransportError>;

    async fn local_branches(&self, repo: &Path) -> Result<Vec<Branch>, TransportError>;

    /// Points `branch` at `upstream` on `remote`.
    async fn set_upstream(
        &self,
        repo: &Path,
        branch: &Branch,
        remote: &str,
        upstream: &str,
    ) -> Result<(), TransportError>;

    /// Pushes `branches` to `remote`, which may be a remote name or a URL.
    async fn push(
        &self,
        repo: &Path,
        remote: &str,
        branches: &[Branch],
        credentials: &Credentials,
    ) -> Result<(), TransportError>;
}

/// [`GitTransport`] backed by the `git` executable on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct CommandGitTransport;

impl CommandGitTransport {
    pub fn new() -> Self {
        Self
    }

    async fn run(
        &self,
        operation: &'static str,
        repo: Option<&Path>,
        credentials: Option<&Credentials>,
        args: &[&str],
    ) -> Result<String, TransportError> {
        let mut cmd = Command::new("git");
        if let Some(credentials) = credentials {
            cmd.arg("-c")
                .arg(format!("http.extraHeader={}", credentials.basic_auth_header()));
        }
        if let Some(repo) = repo {
            cmd.arg("-C").arg(repo);
        }
        cmd.args(args);

        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!(operation, "spawning git");

        let output = cmd.output().await.map_err(|error| {
            TransportError::permanent(operation, format!("failed to spawn git: {}", error))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransportError::new(
                operation,
                format!("status {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn for_each_ref(
        &self,
        operation: &'static str,
        repo: &Path,
        format: &str,
        pattern: &str,
    ) -> Result<Vec<String>, TransportError> {
        let format = format!("--format={}", format);
        let stdout = self
            .run(
                operation,
                Some(repo),
                None,
                &["for-each-ref", format.as_str(), pattern],
            )
            .await?;

        Ok(parse_ref_lines(&stdout))
    }
}

#[async_trait]
impl GitTransport for CommandGitTransport {
    #[instrument(skip(self, credentials), fields(dest = %dest.display()))]
    async fn clone_repository(
        &self,
        url: &str,
        dest: &Path,
        credentials: &Credentials,
    ) -> Result<(), TransportError> {
        let dest = dest.to_string_lossy();
        self.run(
            "clone",
            None,
            Some(credentials),
            &["clone", "--quiet", url, &*dest],
        )
        .await?;

        debug!("git clone succeeded");
        Ok(())
    }

    #[instrument(skip(self), fields(repo = %repo.display()))]
    async fn track_remote_branches(
        &self,
        repo: &Path,
        remote: &str,
    ) -> Result<(), TransportError> {
        let pattern = format!("refs/remotes/{}", remote);
        let remote_branches = self
            .for_each_ref("track remote branches", repo, "%(refname:strip=3)", &pattern)
            .await?;
        let local: Vec<String> = self
            .local_branches(repo)
            .await?
            .into_iter()
            .map(|branch| branch.name)
            .collect();

        for name in branches_to_track(&remote_branches, &local) {
            let start = format!("refs/remotes/{}/{}", remote, name);
            self.run(
                "track remote branches",
                Some(repo),
                None,
                &["branch", "--no-track", name, start.as_str()],
            )
            .await?;
            debug!(branch = %name, "created local branch");
        }

        Ok(())
    }

    #[instrument(skip(self), fields(repo = %repo.display()))]
    async fn remove_remote(&self, repo: &Path, name: &str) -> Result<(), TransportError> {
        self.run("remote remove", Some(repo), None, &["remote", "remove", name])
            .await
            .map(|_| ())
    }

    #[instrument(skip(self, url), fields(repo = %repo.display()))]
    async fn add_remote(&self, repo: &Path, name: &str, url: &str) -> Result<(), TransportError> {
        self.run("remote add", Some(repo), None, &["remote", "add", name, url])
            .await
            .map(|_| ())
    }

    async fn local_branches(&self, repo: &Path) -> Result<Vec<Branch>, TransportError> {
        let names = self
            .for_each_ref("list branches", repo, "%(refname:strip=2)", "refs/heads")
            .await?;

        Ok(names.into_iter().map(Branch::new).collect())
    }

    async fn set_upstream(
        &self,
        repo: &Path,
        branch: &Branch,
        remote: &str,
        upstream: &str,
    ) -> Result<(), TransportError> {
        let remote_key = format!("branch.{}.remote", branch.name);
        let merge_key = format!("branch.{}.merge", branch.name);

        self.run("set upstream", Some(repo), None, &["config", remote_key.as_str(), remote])
            .await?;
        self.run("set upstream", Some(repo), None, &["config", merge_key.as_str(), upstream])
            .await?;

        Ok(())
    }

    #[instrument(skip(self, branches, credentials), fields(repo = %repo.display(), branches = branches.len()))]
    async fn push(
        &self,
        repo: &Path,
        remote: &str,
        branches: &[Branch],
        credentials: &Credentials,
    ) -> Result<(), TransportError> {
        let refspecs: Vec<String> = branches.iter().map(Branch::refspec).collect();
        let mut args = vec!["push", "--porcelain", remote];
        args.extend(refspecs.iter().map(String::as_str));

        self.run("push", Some(repo), Some(credentials), &args).await?;

        debug!("git push succeeded");
        Ok(())
    }
}

fn parse_ref_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remote branches that still need a local counterpart. The symbolic `HEAD`
/// entry is not a branch.
fn branches_to_track<'a>(remote: &'a [String], local: &[String]) -> Vec<&'a str> {
    remote
        .iter()
        .map(String::as_str)
        .filter(|name| *name != "HEAD")
        .filter(|name| !local.iter().any(|existing| existing == name))
        .collect()
}
