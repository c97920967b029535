mod chart;
mod config;
mod document;
mod i18n;
mod loader;
mod manager;
mod report;
mod schema;
mod series;
mod stats;

use crate::config::Config;
use crate::i18n::Language;
use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file; built-in defaults are used without one.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    input_dir: Option<PathBuf>,

    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the full report document.
    Render,

    /// Log a per-month breakdown of the cleaned input.
    Summary,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mut cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    if let Some(input_dir) = args.input_dir {
        cfg.input_dir = input_dir;
    }
    if let Some(output) = args.output {
        cfg.output_file = output;
    }
    if let Some(lang) = args.lang {
        cfg.language = lang;
    }
    log::info!("{cfg:#?}");

    let mgr = Manager::new(cfg).context("failed to construct mgr")?;

    match args.command {
        Command::Render => mgr.render_report()?,
        Command::Summary => mgr.summarize()?,
    }

    Ok(())
}
