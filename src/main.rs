mod cli;
mod commands;
mod config;
mod form;
mod logging;
mod model;
mod notebook;
mod persist;
mod storage;
mod tui;
mod view;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = config::Config::load()?;
    let _logger = match logging::init(&config) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("warning: logging disabled: {:#}", err);
            None
        }
    };
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Init { force } => commands::init(&config, force),
        cli::Command::List { query } => commands::list(&config, query),
        cli::Command::Add { title, body } => commands::add(&config, title, body),
        cli::Command::Edit {
            note_id,
            title,
            body,
        } => commands::edit(&config, note_id, title, body),
        cli::Command::Delete { note_id, yes } => commands::delete(&config, note_id, yes),
        cli::Command::Path => commands::path(&config),
        cli::Command::Tui => commands::tui(&config),
    }
}
