use clap::{Args, Subcommand};
use serde::Serialize;

use konfluxctl::version::{check_pairing, ReleaseBranch, ReleaseVersion};

use super::CmdResult;

#[derive(Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    command: VersionCommand,
}

#[derive(Subcommand)]
enum VersionCommand {
    /// Classify a version string (ga, early_access, early_access_hotfix)
    Classify {
        /// Version string (e.g. 3.4.0-ea.1)
        version: String,
    },
    /// Validate a release branch name (rhoai-X.Y)
    ValidateBranch {
        /// Branch name (e.g. rhoai-3.4)
        branch: String,
    },
    /// Check that a version belongs to a release branch
    Check {
        /// Branch name (e.g. rhoai-3.4)
        branch: String,

        /// Version string (e.g. 3.4.0-ea.1)
        version: String,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum VersionOutput {
    Classify(ClassifyOutput),
    ValidateBranch(ValidateBranchOutput),
    Check(CheckOutput),
}

#[derive(Serialize)]
pub struct ClassifyOutput {
    command: String,
    pub version: String,
    pub kind: &'static str,
    pub first_ea: bool,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ea: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotfix: Option<u32>,
}

#[derive(Serialize)]
pub struct ValidateBranchOutput {
    command: String,
    pub branch: String,
    pub major: u32,
    pub minor: u32,
    pub file_token: String,
}

#[derive(Serialize)]
pub struct CheckOutput {
    command: String,
    pub branch: String,
    pub version: String,
    pub kind: &'static str,
    pub first_ea: bool,
}

pub fn run(args: VersionArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<VersionOutput> {
    match args.command {
        VersionCommand::Classify { version } => {
            let parsed = ReleaseVersion::parse(&version)?;
            Ok((
                VersionOutput::Classify(ClassifyOutput {
                    command: "version.classify".to_string(),
                    version: parsed.to_string(),
                    kind: parsed.kind().as_str(),
                    first_ea: parsed.is_first_ea(),
                    major: parsed.major,
                    minor: parsed.minor,
                    patch: parsed.patch,
                    ea: parsed.ea,
                    hotfix: parsed.hotfix,
                }),
                0,
            ))
        }
        VersionCommand::ValidateBranch { branch } => {
            let parsed = ReleaseBranch::parse(&branch)?;
            Ok((
                VersionOutput::ValidateBranch(ValidateBranchOutput {
                    command: "version.validate-branch".to_string(),
                    branch: parsed.name(),
                    major: parsed.major,
                    minor: parsed.minor,
                    file_token: parsed.file_token(),
                }),
                0,
            ))
        }
        VersionCommand::Check { branch, version } => {
            let (branch, version) = check_pairing(&branch, &version)?;
            Ok((
                VersionOutput::Check(CheckOutput {
                    command: "version.check".to_string(),
                    branch: branch.name(),
                    version: version.to_string(),
                    kind: version.kind().as_str(),
                    first_ea: version.is_first_ea(),
                }),
                0,
            ))
        }
    }
}
