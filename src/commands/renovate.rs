use std::path::PathBuf;

use clap::{Args, Subcommand};

use konfluxctl::renovate::{self, SyncOptions, SyncResult};

use super::CmdResult;

#[derive(Args)]
pub struct RenovateArgs {
    #[command(subcommand)]
    command: RenovateCommand,
}

#[derive(Subcommand)]
enum RenovateCommand {
    /// Copy the canonical Renovate config to another repository checkout
    Sync {
        /// Repository checkout holding the canonical config
        #[arg(long)]
        source_repo: PathBuf,

        /// Repository checkout to synchronize
        #[arg(long)]
        target_repo: PathBuf,

        /// Config file name relative to each repository root
        #[arg(long, default_value = renovate::DEFAULT_CONFIG_FILE)]
        file: String,

        /// Preview without writing
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(args: RenovateArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<SyncResult> {
    match args.command {
        RenovateCommand::Sync {
            source_repo,
            target_repo,
            file,
            dry_run,
        } => {
            let result = renovate::run(&SyncOptions {
                source_repo,
                target_repo,
                file,
                dry_run,
            })?;
            Ok((result, 0))
        }
    }
}
