use crate::mocks::bitbucket::{get_projects_mock, get_repositories_mock};

use repo_migrator::bitbucket_provider::BitbucketProvider;
use repo_migrator::cli::SourceEndpoint;
use repo_migrator::fixtures::bitbucket::{get_page_json, get_project_json, get_repository_json};
use repo_migrator::model::Project;
use repo_migrator::provider::SourceProvider;
use reqwest::Url;
use wiremock::MockServer;

fn provider(mock_server: &MockServer) -> BitbucketProvider {
    let endpoint = SourceEndpoint {
        base_uri: mock_server.uri(),
        username: "alice".to_string(),
        password: "s3cret".to_string(),
    };
    let base_uri = Url::parse(&mock_server.uri()).unwrap();

    BitbucketProvider::new(endpoint, base_uri).unwrap()
}

mod bitbucket_listing {

    use super::*;

    #[tokio::test]
    async fn lists_projects_across_pages() {
        let mock_server = MockServer::start().await;

        get_projects_mock(
            0,
            get_page_json(
                vec![get_project_json("PLAT", "Platform", Some("Shared services"))],
                Some(1),
            ),
        )
        .mount(&mock_server)
        .await;
        get_projects_mock(
            1,
            get_page_json(vec![get_project_json("WEB", "Web", None)], None),
        )
        .mount(&mock_server)
        .await;

        let projects = provider(&mock_server).list_projects().await.unwrap();

        assert_eq!(
            projects,
            vec![
                Project {
                    key: "PLAT".to_string(),
                    name: "Platform".to_string(),
                    description: "Shared services".to_string(),
                },
                Project {
                    key: "WEB".to_string(),
                    name: "Web".to_string(),
                    description: String::new(),
                },
            ]
        );

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn lists_repositories_with_http_clone_url() {
        let mock_server = MockServer::start().await;
        let base_uri = mock_server.uri();

        get_repositories_mock(
            "PLAT",
            0,
            get_page_json(
                vec![
                    get_repository_json(&base_uri, "PLAT", "Billing", true),
                    get_repository_json(&base_uri, "PLAT", "Legacy", false),
                ],
                None,
            ),
        )
        .mount(&mock_server)
        .await;

        let project = Project {
            key: "PLAT".to_string(),
            name: "Platform".to_string(),
            description: String::new(),
        };
        let repositories = provider(&mock_server)
            .list_repositories(&project)
            .await
            .unwrap();

        assert_eq!(repositories.len(), 2);
        assert_eq!(repositories[0].name, "Billing");
        assert_eq!(repositories[0].slug, "billing");
        assert_eq!(
            repositories[0].clone_url,
            Some(format!("{}/scm/plat/billing.git", base_uri))
        );
        assert_eq!(repositories[1].clone_url, None);

        mock_server.verify().await;
    }

    #[tokio::test]
    async fn unauthorized_is_an_error() {
        let mock_server = MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        assert!(provider(&mock_server).list_projects().await.is_err());
    }
}
