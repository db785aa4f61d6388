//! Branch-to-branch pipeline replication: copy every PipelineRun of a
//! source release line to a new branch's naming, substituting the
//! `vX-Y` file token and the bare `X.Y` version token in both file
//! names and file content.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::log_status;
use crate::pipelinerun;
use crate::utils::io;
use crate::version::ReleaseBranch;

#[derive(Debug, Clone, Default)]
pub struct ReplicateOptions {
    pub source_branch: String,
    pub target_branch: String,
    pub base_dir: PathBuf,
    /// Overwrite target files that already exist.
    pub force: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplicatedFile {
    pub source: String,
    pub target: String,
    /// `vX-Y` token substitutions in the copied content.
    pub file_token_substitutions: usize,
    /// Bare `X.Y` token substitutions in the copied content.
    pub version_token_substitutions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplicateResult {
    pub source_branch: String,
    pub target_branch: String,
    pub dry_run: bool,
    pub files: Vec<ReplicatedFile>,
}

/// Replicate all PipelineRun definitions from one release branch's naming
/// to another. Target collisions are fatal unless `force` is set; the
/// collision check runs before the first write.
pub fn run(options: &ReplicateOptions) -> Result<ReplicateResult> {
    let source = ReleaseBranch::parse(&options.source_branch)?;
    let target = ReleaseBranch::parse(&options.target_branch)?;

    if source == target {
        return Err(Error::validation_invalid_argument(
            "targetBranch",
            "Source and target branch are the same",
            Some(target.name()),
        ));
    }

    let files = pipelinerun::find_branch_files(&options.base_dir, &source, None)?;
    if files.is_empty() {
        return Err(Error::pipelinerun_not_found(format!(
            "{}/pipelineruns/*/.tekton/*-{}-*.yaml",
            options.base_dir.display(),
            source.file_token()
        )));
    }

    log_status!(
        "new-branch",
        "Replicating {} PipelineRun files from {} to {}",
        files.len(),
        source,
        target
    );

    let plan: Vec<(PathBuf, PathBuf)> = files
        .iter()
        .map(|file| (file.clone(), target_path(file, &source, &target)))
        .collect();

    if !options.force {
        for (_, target_file) in &plan {
            if target_file.exists() {
                return Err(Error::validation_invalid_argument(
                    "targetBranch",
                    format!("Target file already exists: {}", target_file.display()),
                    None,
                )
                .with_hint("Pass --force to overwrite existing target files"));
            }
        }
    }

    let mut replicated = Vec::with_capacity(plan.len());

    for (source_file, target_file) in &plan {
        let content = io::read_file(source_file, "read PipelineRun")?;

        let file_token_substitutions = content.matches(&source.file_token()).count();
        let rewritten = content.replace(&source.file_token(), &target.file_token());
        let version_token_substitutions = rewritten.matches(&source.version_token()).count();
        let rewritten = rewritten.replace(&source.version_token(), &target.version_token());

        if options.dry_run {
            log_status!(
                "new-branch",
                "Would create {} ({} + {} substitutions)",
                target_file.display(),
                file_token_substitutions,
                version_token_substitutions
            );
        } else {
            io::write_file(target_file, &rewritten, "write PipelineRun")?;
            log_status!("new-branch", "Created {}", target_file.display());
        }

        replicated.push(ReplicatedFile {
            source: relative_to(source_file, &options.base_dir),
            target: relative_to(target_file, &options.base_dir),
            file_token_substitutions,
            version_token_substitutions,
        });
    }

    Ok(ReplicateResult {
        source_branch: source.name(),
        target_branch: target.name(),
        dry_run: options.dry_run,
        files: replicated,
    })
}

/// Target path for a replicated file: same directory, file name with the
/// source branch's tokens swapped for the target's.
fn target_path(source_file: &Path, source: &ReleaseBranch, target: &ReleaseBranch) -> PathBuf {
    let name = source_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let renamed = name
        .replace(&source.file_token(), &target.file_token())
        .replace(&source.version_token(), &target.version_token());
    source_file.with_file_name(renamed)
}

fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}
