pub mod common;
pub mod parser;
pub mod reader;

pub use common::*;
pub use parser::ParsedConfig;

use anyhow::{Context, Result};
use clap::Parser;
use parser::parse_config;
use reader::read_config;

#[derive(Parser)]
#[clap(about = "Migrate every Bitbucket Server repository into a GitHub organization")]
pub struct Args {
    #[clap(short, long, parse(from_os_str))]
    config: std::path::PathBuf,
}

pub fn run() -> Result<ParsedConfig> {
    let args = Args::parse();

    load(&args.config)
}

pub fn load(path: &std::path::Path) -> Result<ParsedConfig> {
    let result = std::fs::read_to_string(path)
        .with_context(|| format!("could not read file `{:?}`", path))?;

    let content = read_config(&result).with_context(|| format!("could not parse `{:?}`", path))?;
    let parsed_config = parse_config(content)?;

    Ok(parsed_config)
}
