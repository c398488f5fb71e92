pub mod cli;
pub mod cloud;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod exec;
pub mod manifest;
pub mod project_identity;
pub mod state;
pub mod telemetry;
pub mod terraform;
pub mod ui;

use clap::Parser;
use std::process::exit;

/// Run sandboxctl CLI entrypoint.
pub fn run_cli() {
    // 0. Initialize color settings (must be first)
    ui::init_colors();

    // 1. Signal handling (mark cancellation and let command flow roll back,
    //    restoring the manifest, before the error surfaces)
    ctrlc::set_handler(move || {
        eprintln!();
        ui::mark_interrupted();
        ui::warning("Operation cancelled by user.");
    })
    .expect("Error setting Ctrl-C handler");

    // 2. Parse & run
    let args = cli::args::Cli::parse();
    ui::set_verbose(args.global.verbose);

    if let Err(e) = cli::dispatcher::dispatch(&args) {
        ui::error(&format!("{}", e));
        exit(e.exit_code());
    }
}
