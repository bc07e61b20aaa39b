use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

pub fn get_projects_mock(start: u32, response: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path("/rest/api/1.0/projects"))
        .and(query_param("start", start.to_string()))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
}

pub fn get_repositories_mock(project_key: &str, start: u32, response: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(format!(
            "/rest/api/1.0/projects/{project_key}/repos",
            project_key = project_key
        )))
        .and(query_param("start", start.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
}
