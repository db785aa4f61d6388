use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw,
}

mod commands;
mod output;

use commands::{arch_table, bump, new_branch, renovate, version};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "konfluxctl")]
#[command(version = VERSION)]
#[command(about = "CLI for Konflux pipeline configuration across release branches")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and classify release versions and branch names
    Version(version::VersionArgs),
    /// Bump the rhoai-version of a branch's PipelineRun files
    Bump(bump::BumpArgs),
    /// Replicate pipeline definitions to a newly created release branch
    NewBranch(new_branch::NewBranchArgs),
    /// Renovate config operations
    Renovate(renovate::RenovateArgs),
    /// Generate the architecture support table
    ArchTable(arch_table::ArchTableArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::ArchTable(_) => ResponseMode::Raw,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let mode = response_mode(&cli.command);

    if let ResponseMode::Raw = mode {
        let raw_result = commands::run_raw(cli.command, &global);

        return match raw_result {
            Ok((content, exit_code)) => {
                print!("{}", content);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                let exit_code = output::exit_code_for_error(err.code);
                let _ = output::print_json_result(Err(err));
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        };
    }

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
