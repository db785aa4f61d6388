//! Architecture-support table generator.
//!
//! Scans PipelineRun files (from the working tree or directly from a git
//! branch), extracts which architectures each component image is built
//! for, and renders a table in one of four formats. Gaps are annotated
//! from a TOML exception list: a known tracking issue, or `N/A` when an
//! accelerator component can never build on the architecture.

mod config;
mod format;

pub use config::{ArchTableConfig, ExceptionRule};

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{Error, Result};
use crate::log_status;
use crate::utils::io;
use crate::{git, pipelinerun};

/// Architecture columns, in render order.
pub const ARCH_COLUMNS: [&str; 4] = ["amd64", "arm64", "ppc64le", "s390x"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Markdown,
    Csv,
    Jira,
    Text,
}

impl TableFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Markdown => "markdown",
            TableFormat::Csv => "csv",
            TableFormat::Jira => "jira",
            TableFormat::Text => "text",
        }
    }
}

/// Component name -> architectures it is built for.
pub type ComponentMap = BTreeMap<String, BTreeSet<String>>;

/// Collect components from PipelineRun files in the working tree.
pub fn collect_components(base_dir: &Path) -> Result<ComponentMap> {
    let files = pipelinerun::find_all_files(base_dir)?;
    if files.is_empty() {
        return Err(Error::pipelinerun_not_found(format!(
            "{}/pipelineruns/*/.tekton/*.yaml",
            base_dir.display()
        )));
    }

    log_status!("arch-table", "Found {} PipelineRun files", files.len());

    let mut components = ComponentMap::new();
    for file in &files {
        match io::read_file(file, "read PipelineRun") {
            Ok(content) => insert_component(&mut components, &content, &file.display().to_string()),
            Err(e) => log_status!("arch-table", "Warning: skipping {}: {}", file.display(), e),
        }
    }

    log_status!("arch-table", "Parsed {} components", components.len());
    Ok(components)
}

/// Collect components from a git branch without checking it out.
pub fn collect_components_from_branch(repo_dir: &Path, branch: &str) -> Result<ComponentMap> {
    if !git::branch_exists(repo_dir, branch) {
        return Err(Error::git_branch_not_found(branch));
    }

    let files = git::ls_pipelinerun_files(repo_dir, branch)?;
    if files.is_empty() {
        return Err(Error::pipelinerun_not_found(format!(
            "pipelineruns/*/.tekton/*.yaml on branch {}",
            branch
        )));
    }

    log_status!(
        "arch-table",
        "Found {} PipelineRun files on branch {}",
        files.len(),
        branch
    );

    let mut components = ComponentMap::new();
    for file in &files {
        match git::show_file(repo_dir, branch, file) {
            Ok(content) => insert_component(&mut components, &content, file),
            Err(e) => log_status!("arch-table", "Warning: {}", e),
        }
    }

    log_status!("arch-table", "Parsed {} components", components.len());
    Ok(components)
}

fn insert_component(components: &mut ComponentMap, content: &str, file: &str) {
    match pipelinerun::parse_params(content, file) {
        Ok(Some(params)) => {
            components.insert(params.component, params.architectures);
        }
        Ok(None) => {}
        Err(e) => log_status!("arch-table", "Warning: skipping {}: {}", file, e),
    }
}

/// Render the table in the requested format.
pub fn generate(components: &ComponentMap, config: &ArchTableConfig, format: TableFormat) -> String {
    match format {
        TableFormat::Csv => format::render_csv(components, config),
        TableFormat::Jira => format::render_jira(components, config),
        TableFormat::Markdown => format::render_markdown(components, config),
        TableFormat::Text => format::render_text(components, config),
    }
}

/// Cell value for one component/architecture pair.
///
/// Priority: built (`Y`), then a configured exception (tracking-issue
/// cell), then an accelerator incompatibility (`N/A`), then blank.
pub fn cell_value(
    component: &str,
    arch: &str,
    built: &BTreeSet<String>,
    config: &ArchTableConfig,
    format: TableFormat,
) -> String {
    if built.contains(arch) {
        return "Y".to_string();
    }

    if let Some(exception) = config.exception_for(component, arch) {
        return issue_cell(exception.issue.as_deref().unwrap_or(""), format);
    }

    if config.is_accelerator_incompatible(component, arch) {
        return "N/A".to_string();
    }

    String::new()
}

fn issue_cell(issue_url: &str, format: TableFormat) -> String {
    let key = extract_issue_key(issue_url);
    if key == "XXX" || issue_url.is_empty() {
        return key;
    }

    match format {
        TableFormat::Markdown => format!("[{}]({})", key, issue_url),
        TableFormat::Jira => format!("[{}|{}]", key, issue_url),
        TableFormat::Csv => format!("=HYPERLINK(\"{}\",\"{}\")", issue_url, key),
        TableFormat::Text => key,
    }
}

/// Extract the tracking-issue key from an issue URL, accepting either a
/// full `/browse/` URL or a bare key. Unknown shapes map to `XXX`.
pub fn extract_issue_key(issue_url: &str) -> String {
    if issue_url.is_empty() {
        return "XXX".to_string();
    }

    if let Some((_, key)) = issue_url.rsplit_once("/browse/") {
        return key.to_string();
    }

    if issue_url.contains('-') && !issue_url.contains('/') {
        return issue_url.to_string();
    }

    "XXX".to_string()
}
