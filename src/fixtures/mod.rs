//! JSON payloads shaped like the Bitbucket and GitHub API responses, shared
//! by the integration tests.

pub mod bitbucket;
pub mod github;
