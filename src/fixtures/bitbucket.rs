use serde_json::{json, Value};

pub fn get_project_json(key: &str, name: &str, description: Option<&str>) -> Value {
    json!({
        "key": key,
        "id": 1,
        "name": name,
        "description": description,
        "public": false,
        "type": "NORMAL",
    })
}

/// Repository with an `ssh` clone link and, when `http_clone` is set, an
/// `http` one.
pub fn get_repository_json(base_uri: &str, project_key: &str, name: &str, http_clone: bool) -> Value {
    let slug = name.to_lowercase();
    let mut clone = vec![json!({
        "name": "ssh",
        "href": format!("ssh://git@bitbucket.example.com:7999/{}/{}.git", project_key.to_lowercase(), slug),
    })];
    if http_clone {
        clone.push(json!({
            "name": "http",
            "href": format!("{}/scm/{}/{}.git", base_uri, project_key.to_lowercase(), slug),
        }));
    }

    json!({
        "slug": slug,
        "id": 1,
        "name": name,
        "scmId": "git",
        "state": "AVAILABLE",
        "project": { "key": project_key },
        "links": { "clone": clone },
    })
}

pub fn get_page_json(values: Vec<Value>, next_page_start: Option<u32>) -> Value {
    json!({
        "size": values.len(),
        "limit": 100,
        "start": 0,
        "isLastPage": next_page_start.is_none(),
        "nextPageStart": next_page_start,
        "values": values,
    })
}
