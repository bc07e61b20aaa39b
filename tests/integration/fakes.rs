use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use repo_migrator::cli::Credentials;
use repo_migrator::git::{Branch, GitTransport, TransportError};

/// Git transport that records calls instead of touching the network. A clone
/// leaves a `.git` directory behind like the real one would.
#[derive(Default)]
pub struct FakeTransport {
    pub calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GitTransport for FakeTransport {
    async fn clone_repository(
        &self,
        url: &str,
        dest: &Path,
        _credentials: &Credentials,
    ) -> Result<(), TransportError> {
        self.record(format!("clone {}", url));
        std::fs::create_dir_all(dest.join(".git")).unwrap();
        Ok(())
    }

    async fn track_remote_branches(&self, _repo: &Path, _remote: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn remove_remote(&self, _repo: &Path, _name: &str) -> Result<(), TransportError> {
        Ok(())
    }

    async fn add_remote(&self, _repo: &Path, name: &str, url: &str) -> Result<(), TransportError> {
        self.record(format!("remote add {} {}", name, url));
        Ok(())
    }

    async fn local_branches(&self, _repo: &Path) -> Result<Vec<Branch>, TransportError> {
        Ok(vec![Branch::new("main"), Branch::new("develop")])
    }

    async fn set_upstream(
        &self,
        _repo: &Path,
        _branch: &Branch,
        _remote: &str,
        _upstream: &str,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    async fn push(
        &self,
        _repo: &Path,
        remote: &str,
        _branches: &[Branch],
        _credentials: &Credentials,
    ) -> Result<(), TransportError> {
        self.record(format!("push {}", remote));
        Ok(())
    }
}
