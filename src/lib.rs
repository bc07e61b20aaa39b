pub mod bitbucket_provider;
pub mod cli;
pub mod decision;
pub mod error;
#[doc(hidden)]
pub mod fixtures;
pub mod git;
pub mod github_provider;
pub mod migrator;
pub mod model;
pub mod provider;
pub mod report;
pub mod retry;
pub mod transfer;
