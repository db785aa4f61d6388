use std::path::PathBuf;

use clap::Args;

use konfluxctl::bump::{self, BumpOptions, BumpResult};

use super::CmdResult;

#[derive(Args)]
pub struct BumpArgs {
    /// Release branch the bump applies to (e.g. rhoai-3.4)
    #[arg(long)]
    branch: String,

    /// Target version (e.g. 3.4.0-ea.2)
    #[arg(long)]
    version: String,

    /// Repository root containing pipelineruns/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Restrict the bump to one component
    #[arg(long)]
    component: Option<String>,

    /// Also rewrite version fields in this build-config YAML
    #[arg(long, value_name = "FILE")]
    build_config: Option<PathBuf>,

    /// Preview the rewrite without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Stage rewritten files with git add
    #[arg(long)]
    stage: bool,
}

pub fn run(args: BumpArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<BumpResult> {
    let result = bump::run(&BumpOptions {
        branch: args.branch,
        version: args.version,
        base_dir: args.base_dir,
        component: args.component,
        build_config: args.build_config,
        dry_run: args.dry_run,
        stage: args.stage,
    })?;

    Ok((result, 0))
}
