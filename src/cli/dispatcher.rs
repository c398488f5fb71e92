//! Command dispatcher
//!
//! Builds the immutable run configuration and routes each CLI command to
//! its handler.

use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::config::RunConfig;
use crate::error::Result;

pub fn dispatch(args: &Cli) -> Result<()> {
    match &args.command {
        Command::Create {
            cluster_location,
            cluster_name,
            project_id,
            terraform_prefix,
            skip_asm,
            skip_loadgenerator,
        } => {
            let cfg = RunConfig::for_create(
                project_id.clone(),
                cluster_name.clone(),
                cluster_location.clone(),
                terraform_prefix.clone(),
                *skip_asm,
                *skip_loadgenerator,
                args.global.verbose,
            )?;
            commands::create::run(&cfg)
        }

        Command::Delete {
            project_id,
            terraform_prefix,
        } => {
            let cfg = RunConfig::for_delete(
                project_id.clone(),
                terraform_prefix.clone(),
                args.global.verbose,
            )?;
            commands::delete::run(&cfg)
        }

        Command::Completions { shell } => commands::completions::run(*shell),
    }
}
