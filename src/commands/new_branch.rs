use std::path::PathBuf;

use clap::Args;

use konfluxctl::replicate::{self, ReplicateOptions, ReplicateResult};

use super::CmdResult;

#[derive(Args)]
pub struct NewBranchArgs {
    /// Branch whose pipeline definitions are copied (e.g. rhoai-3.3)
    #[arg(long)]
    source_branch: String,

    /// Newly created branch receiving the definitions (e.g. rhoai-3.4)
    #[arg(long)]
    target_branch: String,

    /// Repository root containing pipelineruns/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Overwrite target files that already exist
    #[arg(long)]
    force: bool,

    /// Preview the replication plan without writing
    #[arg(long)]
    dry_run: bool,
}

pub fn run(args: NewBranchArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ReplicateResult> {
    let result = replicate::run(&ReplicateOptions {
        source_branch: args.source_branch,
        target_branch: args.target_branch,
        base_dir: args.base_dir,
        force: args.force,
        dry_run: args.dry_run,
    })?;

    Ok((result, 0))
}
