//! Bitbucket Server (Stash) REST API 1.0 client.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::cli::SourceEndpoint;
use crate::error::MigrationError;
use crate::model::{Project, SourceRepository};
use crate::provider::SourceProvider;

const PAGE_LIMIT: u32 = 100;
const HTTP_CLONE_LINK: &str = "http";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedResponse<T> {
    values: Vec<T>,
    #[serde(default)]
    is_last_page: bool,
    next_page_start: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    key: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    name: String,
    slug: String,
    #[serde(default)]
    links: LinksResponse,
}

#[derive(Debug, Default, Deserialize)]
struct LinksResponse {
    #[serde(default)]
    clone: Vec<CloneLink>,
}

#[derive(Debug, Deserialize)]
struct CloneLink {
    name: String,
    href: String,
}

impl From<ProjectResponse> for Project {
    fn from(project: ProjectResponse) -> Self {
        Project {
            key: project.key,
            name: project.name,
            description: project.description.unwrap_or_default(),
        }
    }
}

impl From<RepositoryResponse> for SourceRepository {
    fn from(repository: RepositoryResponse) -> Self {
        let clone_url = repository
            .links
            .clone
            .into_iter()
            .find(|link| link.name == HTTP_CLONE_LINK)
            .map(|link| link.href);

        SourceRepository {
            name: repository.name,
            slug: repository.slug,
            clone_url,
        }
    }
}

pub struct BitbucketProvider {
    client: reqwest::Client,
    base_uri: Url,
    endpoint: SourceEndpoint,
}

impl BitbucketProvider {
    pub fn new(endpoint: SourceEndpoint, base_uri: Url) -> Result<Self, MigrationError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("repo-migrator/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_uri,
            endpoint,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/rest/api/1.0/{}",
            self.base_uri.as_str().trim_end_matches('/'),
            path
        )
    }

    /// Follows `nextPageStart` until the last page.
    async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, MigrationError> {
        let url = self.api_url(path);
        let mut values = Vec::new();
        let mut start = 0;

        loop {
            debug!(%url, start, "fetching page");

            let page: PagedResponse<T> = self
                .client
                .get(&url)
                .basic_auth(&self.endpoint.username, Some(&self.endpoint.password))
                .query(&[("start", start), ("limit", PAGE_LIMIT)])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            values.extend(page.values);

            match page.next_page_start {
                Some(next) if !page.is_last_page => start = next,
                _ => break,
            }
        }

        Ok(values)
    }
}

#[async_trait]
impl SourceProvider for BitbucketProvider {
    async fn list_projects(&self) -> Result<Vec<Project>, MigrationError> {
        let projects: Vec<ProjectResponse> = self.get_all("projects").await?;

        Ok(projects.into_iter().map(Project::from).collect())
    }

    async fn list_repositories(
        &self,
        project: &Project,
    ) -> Result<Vec<SourceRepository>, MigrationError> {
        let path = format!("projects/{}/repos", project.key);
        let repositories: Vec<RepositoryResponse> = self.get_all(&path).await?;

        Ok(repositories
            .into_iter()
            .map(SourceRepository::from)
            .collect())
    }
}
