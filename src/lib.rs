#![forbid(unsafe_code)]

pub mod adapters;
pub mod app;
mod commands;
pub mod domain;
mod infrastructure;
pub mod ports;

use std::process::ExitCode;

use clap::Parser;

use app::{AppController, Overrides};
use commands::Cli;

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize the application controller
    let controller = match AppController::new(Overrides {
        database: cli.database.clone(),
        offline: cli.offline,
    }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to initialize application: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // One pipeline at a time on a single thread
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(commands::execute(&controller, cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
