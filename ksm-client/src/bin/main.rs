use std::{env, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ksm_client::{check, load, version, AppConfig, RequestDocument, SchemaFile};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = env::args().collect::<Vec<_>>();
    let config =
        if args.len() == 3 && (args[1] == "-c" || args[1] == "--config") {
            load(&args[2])?
        } else {
            AppConfig::parse()
        };

    // stdout carries the verdict, logs go to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("{:#?}", &config);
    info!("{}", version());

    let schema = SchemaFile::load(&config.schema)?;
    let request = RequestDocument::load(&config.request)?;
    let outcome = check(schema, request).await;

    let rendered = if config.pretty {
        serde_json::to_string_pretty(&outcome.body)
    } else {
        serde_json::to_string(&outcome.body)
    }
    .context("could not render outcome")?;
    println!("{}", rendered);

    if outcome.is_success() {
        return Ok(ExitCode::SUCCESS);
    }
    warn!(status = %outcome.status, "request failed the schema check");
    Ok(ExitCode::FAILURE)
}
