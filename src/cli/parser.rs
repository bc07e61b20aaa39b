use std::path::PathBuf;

use reqwest::Url;

use super::{
    common::{SourceEndpoint, TargetEndpoint},
    reader,
};
use crate::error::MigrationError;

pub const DEFAULT_GITHUB_URI: &str = "https://api.github.com";

#[derive(Clone, Debug)]
pub struct ParsedConfig {
    pub source: SourceEndpoint,
    pub target: TargetEndpoint,
    pub source_uri: Url,
    pub target_uri: Url,
    pub temp_path: PathBuf,
}

pub fn parse_config(config: reader::Config) -> Result<ParsedConfig, MigrationError> {
    let source_uri = parse_uri(&config.source.base_uri)?;
    let target_uri = parse_uri(
        config
            .target
            .base_uri
            .as_deref()
            .unwrap_or(DEFAULT_GITHUB_URI),
    )?;

    let temp_path = config
        .temp_path
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    Ok(ParsedConfig {
        source: config.source,
        target: config.target,
        source_uri,
        target_uri,
        temp_path,
    })
}

fn parse_uri(val: &str) -> Result<Url, MigrationError> {
    Url::parse(val).map_err(|error| MigrationError::Config(format!("invalid uri `{}`: {}", val, error)))
}
