use serde::Deserialize;
use serde_yaml;

use super::common::{SourceEndpoint, TargetEndpoint};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Config {
    pub source: SourceEndpoint,
    pub target: TargetEndpoint,
    pub temp_path: Option<String>,
}

pub fn read_config(config: &str) -> Result<Config, serde_yaml::Error> {
    serde_yaml::from_str(config)
}
