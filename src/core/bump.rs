//! Version bumper for release branches: EA increments, EA hotfixes, GA,
//! and z-stream patches all go through the same flow. The classification
//! lives in [`crate::version`]; this module only locates files, validates
//! consistency, and rewrites the `rhoai-version` occurrences in place.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::git;
use crate::log_status;
use crate::pipelinerun;
use crate::utils::{io, parser, validation};
use crate::version::{check_pairing, ReleaseVersion};

/// Build-config version fields: `rhoai-version:` or plain `version:` keys
/// at the start of a line.
const BUILD_CONFIG_PATTERN: &str = r#"(?m)^\s*(?:rhoai-)?version:\s*"?([0-9][0-9A-Za-z.\-]*)"#;

#[derive(Debug, Clone, Default)]
pub struct BumpOptions {
    pub branch: String,
    pub version: String,
    pub base_dir: PathBuf,
    /// Restrict the bump to one component directory.
    pub component: Option<String>,
    /// Also rewrite version fields in this build-config YAML.
    pub build_config: Option<PathBuf>,
    pub dry_run: bool,
    /// Stage rewritten files with `git add` (never commits).
    pub stage: bool,
}

/// One rewritten (or to-be-rewritten) PipelineRun file.
#[derive(Debug, Clone, Serialize)]
pub struct BumpFileInfo {
    pub file: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildConfigInfo {
    pub file: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BumpResult {
    pub branch: String,
    pub old_version: String,
    pub new_version: String,
    pub kind: &'static str,
    pub first_ea: bool,
    pub dry_run: bool,
    pub staged: bool,
    pub files: Vec<BumpFileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_config: Option<BuildConfigInfo>,
}

/// Bump every PipelineRun on a branch to a new version.
///
/// Pre-validates everything (branch/version pairing, per-file consistency,
/// cross-file agreement, monotonicity) before the first write, so a failure
/// never leaves the tree half-rewritten.
pub fn run(options: &BumpOptions) -> Result<BumpResult> {
    let (branch, target) = check_pairing(&options.branch, &options.version)?;

    let component = match options.component.as_deref() {
        Some(c) => Some(
            validation::require_non_empty(c, "component", "Component filter cannot be empty")?
                .to_string(),
        ),
        None => None,
    };

    let files = pipelinerun::find_branch_files(&options.base_dir, &branch, component.as_deref())?;
    if files.is_empty() {
        return Err(Error::pipelinerun_not_found(format!(
            "{}/pipelineruns/{}/.tekton/*-{}-*.yaml",
            options.base_dir.display(),
            component.as_deref().unwrap_or("*"),
            branch.file_token()
        )));
    }

    log_status!(
        "bump",
        "Found {} PipelineRun files for {}",
        files.len(),
        branch
    );

    // Read every file first; all must agree on the current version.
    let mut contents: Vec<(PathBuf, String, usize)> = Vec::with_capacity(files.len());
    let mut versions: Vec<String> = Vec::new();

    for file in &files {
        let content = io::read_file(file, "read PipelineRun")?;
        let display = file.display().to_string();
        let (value, count) = pipelinerun::read_rhoai_version(&content, &display)?;
        versions.push(value);
        contents.push((file.clone(), content, count));
    }

    let old_value = parser::require_identical(&versions, "PipelineRun files")?;
    let old = ReleaseVersion::parse(&old_value)?;

    if !old.matches_branch(&branch) {
        return Err(Error::version_branch_mismatch(branch.name(), old.to_string()));
    }
    if !target.is_newer_than(&old) {
        return Err(Error::version_not_monotonic(old.to_string(), target.to_string()));
    }

    log_status!(
        "bump",
        "{} -> {} ({})",
        old,
        target,
        target.kind().as_str()
    );
    if target.is_first_ea() {
        log_status!("bump", "Target is the first EA build of the {} line", branch.version_token());
    }

    let mut result_files = Vec::with_capacity(contents.len());
    let mut rewritten: Vec<String> = Vec::new();

    for (path, content, expected) in &contents {
        let (new_content, count) = pipelinerun::replace_rhoai_version(content, &options.version);
        if count != *expected {
            return Err(Error::internal_unexpected(format!(
                "Unexpected replacement count in {}: replaced {}, found {}",
                path.display(),
                count,
                expected
            )));
        }

        if options.dry_run {
            log_status!("bump", "Would update {} ({} occurrences)", path.display(), count);
        } else {
            io::write_file_atomic(path, &new_content, "write PipelineRun")?;
            log_status!("bump", "Updated {} ({} occurrences)", path.display(), count);
            rewritten.push(relative_to(path, &options.base_dir));
        }

        result_files.push(BumpFileInfo {
            file: relative_to(path, &options.base_dir),
            occurrences: count,
        });
    }

    let build_config = match &options.build_config {
        Some(path) => Some(bump_build_config(
            path,
            &old_value,
            &options.version,
            options.dry_run,
        )?),
        None => None,
    };

    if let (Some(info), false) = (&build_config, options.dry_run) {
        rewritten.push(relative_to(Path::new(&info.file), &options.base_dir));
    }

    let staged = options.stage && !options.dry_run;
    if staged {
        git::stage_files(&options.base_dir, &rewritten)?;
        log_status!("bump", "Staged {} files", rewritten.len());
    }

    Ok(BumpResult {
        branch: branch.name(),
        old_version: old_value,
        new_version: target.to_string(),
        kind: target.kind().as_str(),
        first_ea: target.is_first_ea(),
        dry_run: options.dry_run,
        staged,
        files: result_files,
        build_config,
    })
}

/// Rewrite the version fields of a build-config YAML. All version fields
/// must carry the expected old value before anything is written.
fn bump_build_config(
    path: &Path,
    old_version: &str,
    new_version: &str,
    dry_run: bool,
) -> Result<BuildConfigInfo> {
    let content = io::read_file(path, "read build config")?;
    let display = path.display().to_string();

    let current = parser::extract_first(&content, BUILD_CONFIG_PATTERN)
        .ok_or_else(|| Error::pipelinerun_field_missing(&display, "version"))?;
    if current != old_version {
        return Err(Error::internal_unexpected(format!(
            "Version mismatch in {}: found {}, expected {}",
            display, current, old_version
        )));
    }

    let all = parser::extract_all(&content, BUILD_CONFIG_PATTERN).unwrap_or_default();
    parser::require_identical(&all, &display)?;

    let (new_content, count) = parser::replace_all(&content, BUILD_CONFIG_PATTERN, new_version)
        .ok_or_else(|| Error::internal_unexpected("Invalid build-config pattern"))?;

    if dry_run {
        log_status!("bump", "Would update {} ({} fields)", display, count);
    } else {
        io::write_file_atomic(path, &new_content, "write build config")?;
        log_status!("bump", "Updated {} ({} fields)", display, count);
    }

    Ok(BuildConfigInfo {
        file: display,
        occurrences: count,
    })
}

fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}
