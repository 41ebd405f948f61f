use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug, Clone, Deserialize)]
#[command(name = "ksmctl")]
#[command(author, version, about = "Check plugin requests against a path schema", long_about = None)]
pub struct AppConfig {
    #[clap(long)]
    #[arg(short = 'c')]
    #[serde(default)]
    pub config: Option<String>,
    /// TOML file declaring the path pattern and its fields.
    #[clap(long, env = "KSM_SCHEMA")]
    #[arg(short = 's')]
    pub schema: String,
    /// JSON file holding the request to check.
    #[clap(long, env = "KSM_REQUEST")]
    #[arg(short = 'r')]
    pub request: String,
    #[clap(long, env)]
    #[arg(default_value_t = String::from("ksmctl=info"))]
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
    #[clap(long, env = "KSM_PRETTY")]
    #[arg(default_value_t = false)]
    #[serde(default)]
    pub pretty: bool,
}

fn default_rust_log() -> String {
    String::from("ksmctl=info")
}

pub fn load(cfg: &str) -> Result<AppConfig> {
    let content =
        fs::read_to_string(cfg).context("could not read config file")?;
    toml::from_str(&content).context("could not parse config file")
}
