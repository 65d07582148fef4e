//! reticular - demo application built on the reticular framework

mod commands;

use std::process::ExitCode;

use anyhow::{Context, Result};
use reticular::{Cli, Settings};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<i32> {
    let settings = Settings::load(commands::APP)?;
    init_logging(&settings);

    let mut builder = Cli::builder(commands::APP, env!("CARGO_PKG_VERSION"))
        .package(commands::PACKAGE)
        .prompt(settings.prompt.clone())
        .catalog(commands::catalog());
    if let Some(message) = &settings.message {
        builder = builder.message(message.clone());
    }

    let mut cli = builder.build().context("Failed to assemble command line")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = cli.run(args.as_slice())?;
    Ok(code)
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_env("RETICULAR_LOG").unwrap_or_else(|_| {
        let level = settings.log_level.as_deref().unwrap_or("warn");
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
