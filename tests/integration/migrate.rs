use crate::fakes::FakeTransport;
use crate::mocks::bitbucket::{get_projects_mock, get_repositories_mock};
use crate::mocks::github::{create_repo_mock, list_repos_mock, no_create_mock};

use std::path::Path;
use std::time::Duration;

use repo_migrator::bitbucket_provider::BitbucketProvider;
use repo_migrator::cli::{ParsedConfig, SourceEndpoint, TargetEndpoint};
use repo_migrator::fixtures::{bitbucket, github};
use repo_migrator::github_provider::GithubProvider;
use repo_migrator::migrator::Migrator;
use repo_migrator::report::Outcome;
use repo_migrator::transfer::TransferEngine;
use reqwest::Url;
use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(bitbucket: &MockServer, github: &MockServer, temp_path: &Path) -> ParsedConfig {
    ParsedConfig {
        source: SourceEndpoint {
            base_uri: bitbucket.uri(),
            username: "bb-user".to_string(),
            password: "bb-pass".to_string(),
        },
        target: TargetEndpoint {
            base_uri: Some(github.uri()),
            organization: "acme".to_string(),
            username: "gh-user".to_string(),
            token: "gh-token".to_string(),
        },
        source_uri: Url::parse(&bitbucket.uri()).unwrap(),
        target_uri: Url::parse(&github.uri()).unwrap(),
        temp_path: temp_path.to_path_buf(),
    }
}

fn migrator(config: &ParsedConfig) -> Migrator<BitbucketProvider, GithubProvider, FakeTransport> {
    let source = BitbucketProvider::new(config.source.clone(), config.source_uri.clone()).unwrap();
    let target = GithubProvider::new(&config.target, config.target_uri.clone());
    let engine = TransferEngine::new(FakeTransport::default()).with_delay_unit(Duration::from_millis(1));

    Migrator::new(config, source, target, engine)
}

mod migrate {

    use super::*;

    #[tokio::test]
    async fn duplicate_names_across_projects() {
        let bitbucket_server = MockServer::start().await;
        let github_server = MockServer::start().await;
        let temp = tempfile::tempdir().unwrap();
        let base_uri = bitbucket_server.uri();

        get_projects_mock(
            0,
            bitbucket::get_page_json(
                vec![
                    bitbucket::get_project_json("P1", "First", None),
                    bitbucket::get_project_json("P2", "Second", None),
                ],
                None,
            ),
        )
        .mount(&bitbucket_server)
        .await;
        get_repositories_mock(
            "P1",
            0,
            bitbucket::get_page_json(
                vec![
                    bitbucket::get_repository_json(&base_uri, "P1", "A", true),
                    bitbucket::get_repository_json(&base_uri, "P1", "B", true),
                ],
                None,
            ),
        )
        .mount(&bitbucket_server)
        .await;
        get_repositories_mock(
            "P2",
            0,
            bitbucket::get_page_json(
                vec![
                    bitbucket::get_repository_json(&base_uri, "P2", "B", true),
                    bitbucket::get_repository_json(&base_uri, "P2", "C", true),
                ],
                None,
            ),
        )
        .mount(&bitbucket_server)
        .await;

        list_repos_mock("acme", 1, json!([]))
            .mount(&github_server)
            .await;
        for (project, name) in [("First", "A"), ("First", "B"), ("Second", "C")] {
            create_repo_mock(
                "acme",
                name,
                &format!("Migrated from {} - {}.", project, name),
                201,
                github::get_repository_json("acme", name, 0),
            )
            .mount(&github_server)
            .await;
        }

        let config = config(&bitbucket_server, &github_server, temp.path());
        let migrator = migrator(&config);

        let report = migrator.migrate().await.unwrap();

        assert_eq!(report.repositories_with(&Outcome::Created), vec!["A", "B", "C"]);
        assert_eq!(
            report.repositories_with(&Outcome::SkippedDuplicateName),
            vec!["B"]
        );
        assert!(!report.has_failures());

        bitbucket_server.verify().await;
        github_server.verify().await;
    }

    #[tokio::test]
    async fn empty_target_with_local_clone_only_pushes() {
        let bitbucket_server = MockServer::start().await;
        let github_server = MockServer::start().await;
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("A").join(".git")).unwrap();
        let base_uri = bitbucket_server.uri();

        get_projects_mock(
            0,
            bitbucket::get_page_json(vec![bitbucket::get_project_json("P1", "First", None)], None),
        )
        .mount(&bitbucket_server)
        .await;
        get_repositories_mock(
            "P1",
            0,
            bitbucket::get_page_json(
                vec![bitbucket::get_repository_json(&base_uri, "P1", "A", true)],
                None,
            ),
        )
        .mount(&bitbucket_server)
        .await;

        list_repos_mock("acme", 1, json!([github::get_repository_json("acme", "A", 0)]))
            .mount(&github_server)
            .await;
        no_create_mock("acme").mount(&github_server).await;

        let config = config(&bitbucket_server, &github_server, temp.path());
        let migrator = migrator(&config);

        let report = migrator.migrate().await.unwrap();

        assert_eq!(report.repositories_with(&Outcome::Resumed), vec!["A"]);
        let transport = migrator.engine().transport();
        assert!(transport.calls_starting_with("clone").is_empty());
        assert_eq!(transport.calls_starting_with("push").len(), 1);

        github_server.verify().await;
    }

    #[tokio::test]
    async fn bad_github_credentials_abort_the_run() {
        let bitbucket_server = MockServer::start().await;
        let github_server = MockServer::start().await;
        let temp = tempfile::tempdir().unwrap();

        get_projects_mock(
            0,
            bitbucket::get_page_json(vec![bitbucket::get_project_json("P1", "First", None)], None),
        )
        .mount(&bitbucket_server)
        .await;
        Mock::given(wiremock::matchers::method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest",
            })))
            .mount(&github_server)
            .await;

        let config = config(&bitbucket_server, &github_server, temp.path());
        let migrator = migrator(&config);

        assert!(migrator.migrate().await.is_err());
    }
}
