//! Cross-repository Renovate-config synchronizer: copies the canonical
//! dependency-update config from one repository checkout to another.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::log_status;
use crate::utils::{io, validation};

pub const DEFAULT_CONFIG_FILE: &str = "renovate.json";

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub source_repo: PathBuf,
    pub target_repo: PathBuf,
    /// Config file name relative to each repository root.
    pub file: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub file: String,
    pub source: String,
    pub target: String,
    pub changed: bool,
    pub dry_run: bool,
}

pub fn run(options: &SyncOptions) -> Result<SyncResult> {
    let file = validation::require_non_empty(&options.file, "file", "Config file name is required")?;

    let source_path = options.source_repo.join(file);
    let target_path = options.target_repo.join(file);

    if !source_path.exists() {
        return Err(Error::internal_io(
            format!("Source config does not exist: {}", source_path.display()),
            Some("renovate sync".to_string()),
        ));
    }
    if !options.target_repo.is_dir() {
        return Err(Error::validation_invalid_argument(
            "targetRepo",
            "Target repository directory does not exist",
            Some(options.target_repo.display().to_string()),
        ));
    }

    let source_content = io::read_file(&source_path, "read renovate config")?;
    let target_content = existing_content(&target_path)?;
    let changed = target_content.as_deref() != Some(source_content.as_str());

    if !changed {
        log_status!("renovate", "{} already in sync", target_path.display());
    } else if options.dry_run {
        log_status!("renovate", "Would update {}", target_path.display());
    } else {
        io::write_file(&target_path, &source_content, "write renovate config")?;
        log_status!("renovate", "Updated {}", target_path.display());
    }

    Ok(SyncResult {
        file: file.to_string(),
        source: source_path.display().to_string(),
        target: target_path.display().to_string(),
        changed,
        dry_run: options.dry_run,
    })
}

fn existing_content(path: &Path) -> Result<Option<String>> {
    if path.exists() {
        io::read_file(path, "read renovate config").map(Some)
    } else {
        Ok(None)
    }
}
