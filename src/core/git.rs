//! Git plumbing for reading pipeline definitions without a checkout and
//! for staging rewritten files. Never commits, never pushes.

use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::{command, parser};

/// Check whether a branch or ref resolves in the repository.
pub fn branch_exists(repo_dir: &Path, branch: &str) -> bool {
    command::succeeded_in(
        &repo_dir.to_string_lossy(),
        "git",
        &["rev-parse", "--verify", branch],
    )
}

pub(crate) fn is_git_repo(path: &Path) -> bool {
    command::succeeded_in(&path.to_string_lossy(), "git", &["rev-parse", "--git-dir"])
}

/// List PipelineRun YAML files on a branch via `git ls-tree`, without
/// checking the branch out. Returns sorted paths relative to the repo root.
pub fn ls_pipelinerun_files(repo_dir: &Path, branch: &str) -> Result<Vec<String>> {
    let stdout = command::run_in(
        &repo_dir.to_string_lossy(),
        "git",
        &["ls-tree", "-r", "--name-only", branch, "pipelineruns/"],
        "git ls-tree",
    )
    .map_err(|e| Error::git_command_failed(error_detail(&e)))?;

    let mut files: Vec<String> = parser::lines(&stdout)
        .filter(|f| f.contains("/.tekton/") && f.ends_with(".yaml"))
        .map(String::from)
        .collect();
    files.sort();
    Ok(files)
}

/// Read one file's content from a branch via `git show`.
pub fn show_file(repo_dir: &Path, branch: &str, file: &str) -> Result<String> {
    let spec = format!("{}:{}", branch, file);
    command::run_in(
        &repo_dir.to_string_lossy(),
        "git",
        &["show", &spec],
        "git show",
    )
    .map_err(|e| {
        Error::git_command_failed(format!(
            "Could not read '{}' from branch '{}': {}",
            file,
            branch,
            error_detail(&e)
        ))
    })
}

/// Stage files with `git add`. The commit itself is left to the operator.
pub fn stage_files(repo_dir: &Path, files: &[String]) -> Result<()> {
    if files.is_empty() {
        return Ok(());
    }
    if !is_git_repo(repo_dir) {
        return Err(Error::git_command_failed(format!(
            "{} is not a git repository",
            repo_dir.display()
        )));
    }

    let mut args: Vec<&str> = vec!["add", "--"];
    args.extend(files.iter().map(String::as_str));
    command::run_in(&repo_dir.to_string_lossy(), "git", &args, "git add")
        .map_err(|e| Error::git_command_failed(error_detail(&e)))?;
    Ok(())
}

/// Pull the underlying error text out of a command error's details.
fn error_detail(err: &Error) -> String {
    err.details
        .get("error")
        .and_then(|v| v.as_str())
        .unwrap_or(&err.message)
        .to_string()
}
