use serde_json::{json, Value};

pub fn get_repository_json(owner: &str, name: &str, size: u64) -> Value {
    json!({
        "id": 1,
        "node_id": "R_1",
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "private": false,
        "size": size,
        "url": format!("https://api.github.com/repos/{}/{}", owner, name),
        "clone_url": format!("https://github.com/{}/{}.git", owner, name),
    })
}

pub fn get_already_exists_json() -> Value {
    json!({
        "message": "Repository creation failed.",
        "errors": [{
            "resource": "Repository",
            "code": "custom",
            "field": "name",
            "message": "name already exists on this account",
        }],
        "documentation_url": "https://docs.github.com/rest/repos/repos#create-an-organization-repository",
    })
}
