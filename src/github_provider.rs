//! GitHub target: a lazily built, shared `Octocrab` handle and the
//! organization-scoped repository calls made through it.

use std::sync::Arc;

use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::cli::TargetEndpoint;
use crate::error::MigrationError;
use crate::model::{NewRepository, TargetRepository};
use crate::provider::TargetProvider;

const PER_PAGE: u8 = 100;

/// Builds the authenticated GitHub client on first use and hands out the
/// same instance afterwards.
pub struct GithubClientFactory {
    base_uri: Url,
    token: String,
    client: OnceCell<Arc<Octocrab>>,
}

impl GithubClientFactory {
    pub fn new(endpoint: &TargetEndpoint, base_uri: Url) -> Self {
        Self {
            base_uri,
            token: endpoint.token.clone(),
            client: OnceCell::new(),
        }
    }

    pub async fn get_or_create_client(&self) -> Result<Arc<Octocrab>, MigrationError> {
        let client = self
            .client
            .get_or_try_init(|| async { self.build_client() })
            .await?;

        Ok(Arc::clone(client))
    }

    fn build_client(&self) -> Result<Arc<Octocrab>, MigrationError> {
        let client = Octocrab::builder()
            .base_uri(self.base_uri.as_str().trim_end_matches('/'))?
            .personal_token(self.token.clone())
            .build()?;

        info!(base_uri = %self.base_uri, "created GitHub client");
        Ok(Arc::new(client))
    }
}

#[derive(Debug, Serialize)]
struct ListParams {
    per_page: u8,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    clone_url: Option<String>,
}

impl From<RepositoryResponse> for TargetRepository {
    fn from(repository: RepositoryResponse) -> Self {
        TargetRepository {
            name: repository.name,
            clone_url: repository.clone_url.unwrap_or_default(),
            size: repository.size,
        }
    }
}

/// Check if an error is GitHub refusing a repository name that is taken.
pub fn is_already_exists_error(e: &octocrab::Error) -> bool {
    const MARKER: &str = "already exists";

    match e {
        octocrab::Error::GitHub { source, .. } => {
            source.status_code.as_u16() == 422
                && (source.message.contains(MARKER)
                    || source
                        .errors
                        .iter()
                        .flatten()
                        .any(|detail| detail.to_string().contains(MARKER)))
        }
        _ => false,
    }
}

pub struct GithubProvider {
    factory: GithubClientFactory,
    organization: String,
}

impl GithubProvider {
    pub fn new(endpoint: &TargetEndpoint, base_uri: Url) -> Self {
        Self {
            factory: GithubClientFactory::new(endpoint, base_uri),
            organization: endpoint.organization.clone(),
        }
    }

    fn repos_route(&self) -> String {
        format!("/orgs/{}/repos", self.organization)
    }
}

#[async_trait]
impl TargetProvider for GithubProvider {
    async fn list_repositories(&self) -> Result<Vec<TargetRepository>, MigrationError> {
        let client = self.factory.get_or_create_client().await?;
        let route = self.repos_route();
        let mut repositories = Vec::new();
        let mut page = 1u32;

        loop {
            let params = ListParams {
                per_page: PER_PAGE,
                page,
            };
            let items: Vec<RepositoryResponse> = client.get(&route, Some(&params)).await?;
            let count = items.len();

            debug!(organization = %self.organization, page, count, "fetched repositories page");
            repositories.extend(items.into_iter().map(TargetRepository::from));

            if count < PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        Ok(repositories)
    }

    async fn create_repository(
        &self,
        repository: &NewRepository,
    ) -> Result<TargetRepository, MigrationError> {
        let client = self.factory.get_or_create_client().await?;

        let created: Result<RepositoryResponse, octocrab::Error> =
            client.post(self.repos_route(), Some(repository)).await;

        match created {
            Ok(created) => Ok(created.into()),
            Err(error) if is_already_exists_error(&error) => Err(
                MigrationError::RepositoryAlreadyExists(repository.name.clone()),
            ),
            Err(error) => Err(error.into()),
        }
    }
}
