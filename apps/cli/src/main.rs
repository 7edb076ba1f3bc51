#![allow(clippy::print_stdout)]

use anyhow::Context;
use certchain::Ledger;
use certchain::domain::config::LedgerConfig;
use certchain::kernel::config::load_config;
use certchain_cli::args::Cli;
use certchain_cli::commands::execute;
use certchain_cli::{config_path, init_logger};
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let cfg: LedgerConfig = load_config(config_path(cli.config))
        .context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;

    let mut ledger = Ledger::open_from_config(&cfg).context("Failed to open ledger")?;
    info!(backend = ?cfg.storage.backend, admin = %ledger.admin(), "Ledger opened");

    let response = execute(&mut ledger, cli.command);
    println!("{}", serde_json::to_string(&response)?);

    Ok(if response.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
