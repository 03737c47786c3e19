//! `gameconfig` command line editor.
//!
//! Finds the GameConfigData document under `--root`, loads record schemas from
//! `--schemas` and applies one editing command. Commands that change the
//! document save it before exiting.
//!
//! Set `RUST_LOG=debug` to trace schema loading and record binding.

#[macro_use]
extern crate log;

use clap::Parser;
use colored::Colorize;

mod args;
mod commands;

use crate::{args::Cli, commands::CommandHandler};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("{cli:?}");

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut handler = CommandHandler::open(&cli)?;
    handler.handle(cli.command)
}
