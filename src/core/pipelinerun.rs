//! PipelineRun file conventions: discovery by directory/glob layout,
//! `rhoai-version` field access, and param extraction for reporting.
//!
//! Layout: `pipelineruns/<component>/.tekton/<component>-v<major>-<minor>-{push,scheduled}.yaml`

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::parser;
use crate::version::ReleaseBranch;

/// The version can appear as a pipeline param...
///
/// ```yaml
///     - name: rhoai-version
///       value: 3.4.0-ea.1
/// ```
const PARAM_PATTERN: &str = r#"-\s+name:\s+rhoai-version\s*\n\s+value:\s+"?([0-9][0-9A-Za-z.\-]*)"#;

/// ...or embedded in a label-style mapping:
///
/// ```yaml
///   rhoai-version: "3.4.0-ea.1"
/// ```
const LABEL_PATTERN: &str = r#"rhoai-version["']?\s*:\s*["']?([0-9][0-9A-Za-z.\-]*)"#;

/// Find the PipelineRun files carrying a branch's `v<major>-<minor>` file
/// token, optionally restricted to one component directory.
pub fn find_branch_files(
    base_dir: &Path,
    branch: &ReleaseBranch,
    component: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let component_glob = component.unwrap_or("*");
    let pattern = format!(
        "{}/pipelineruns/{}/.tekton/*-{}-*.yaml",
        base_dir.display(),
        component_glob,
        branch.file_token()
    );
    glob_files(&pattern)
}

/// Find every PipelineRun file regardless of branch token.
pub fn find_all_files(base_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/pipelineruns/*/.tekton/*.yaml", base_dir.display());
    glob_files(&pattern)
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| {
        Error::validation_invalid_argument("baseDir", e.to_string(), Some(pattern.to_string()))
    })?;

    let mut files: Vec<PathBuf> = paths.filter_map(|entry| entry.ok()).collect();
    files.sort();
    Ok(files)
}

/// Read the `rhoai-version` value from PipelineRun content. Both the param
/// form and the label form are read; every occurrence in the file must
/// agree. Returns the value and the total occurrence count.
pub fn read_rhoai_version(content: &str, file: &str) -> Result<(String, usize)> {
    let mut values = Vec::new();
    for pattern in [PARAM_PATTERN, LABEL_PATTERN] {
        if let Some(found) = parser::extract_all(content, pattern) {
            values.extend(found);
        }
    }

    if values.is_empty() {
        return Err(Error::pipelinerun_field_missing(file, "rhoai-version"));
    }

    let count = values.len();
    let value = parser::require_identical(&values, file)?;
    Ok((value, count))
}

/// Rewrite every `rhoai-version` occurrence in place. Only the version
/// bytes change; everything around them is preserved.
pub fn replace_rhoai_version(content: &str, new_version: &str) -> (String, usize) {
    let mut result = content.to_string();
    let mut total = 0usize;
    for pattern in [PARAM_PATTERN, LABEL_PATTERN] {
        if let Some((replaced, count)) = parser::replace_all(&result, pattern, new_version) {
            result = replaced;
            total += count;
        }
    }
    (result, total)
}

/// Params extracted from a PipelineRun for the architecture table.
#[derive(Debug, Clone)]
pub struct PipelineRunParams {
    pub component: String,
    pub architectures: BTreeSet<String>,
}

/// Parse PipelineRun YAML and pull out the component name (from
/// `output-image`) and its normalized build architectures (from
/// `build-platforms`). Returns None when either param is absent, so
/// non-build PipelineRuns are skipped rather than fatal.
pub fn parse_params(content: &str, file: &str) -> Result<Option<PipelineRunParams>> {
    let doc: serde_yml::Value = serde_yml::from_str(content)
        .map_err(|e| Error::internal_yaml(e.to_string(), Some(file.to_string())))?;

    let params = match doc
        .get("spec")
        .and_then(|spec| spec.get("params"))
        .and_then(|params| params.as_sequence())
    {
        Some(params) => params,
        None => return Ok(None),
    };

    let mut output_image = None;
    let mut platforms = Vec::new();

    for param in params {
        match param.get("name").and_then(|n| n.as_str()) {
            Some("output-image") => {
                output_image = param.get("value").and_then(|v| v.as_str()).map(String::from);
            }
            Some("build-platforms") => {
                if let Some(values) = param.get("value").and_then(|v| v.as_sequence()) {
                    platforms = values
                        .iter()
                        .filter_map(|v| v.as_str().map(String::from))
                        .collect();
                }
            }
            _ => {}
        }
    }

    let (output_image, platforms) = match (output_image, platforms.is_empty()) {
        (Some(image), false) => (image, platforms),
        _ => return Ok(None),
    };

    let architectures = platforms
        .iter()
        .map(|p| normalize_architecture(p))
        .collect();

    Ok(Some(PipelineRunParams {
        component: extract_component_name(&output_image),
        architectures,
    }))
}

/// Normalize a build platform string to an architecture name.
///
/// Strips prefixes like `linux/`, `linux-m2xlarge/`, `linux-extra-fast/`
/// and maps `x86_64` to `amd64`.
pub fn normalize_architecture(platform: &str) -> String {
    let arch = platform.rsplit('/').next().unwrap_or(platform);
    if arch == "x86_64" {
        "amd64".to_string()
    } else {
        arch.to_string()
    }
}

/// Extract the component name from an `output-image` value: strip the
/// `quay.io/rhoai/` prefix and any `:tag` suffix, keeping suffixes like
/// `-rhel9` intact.
pub fn extract_component_name(output_image: &str) -> String {
    let name = output_image
        .strip_prefix("quay.io/rhoai/")
        .unwrap_or(output_image);
    name.split(':').next().unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIPELINERUN: &str = r#"apiVersion: tekton.dev/v1
kind: PipelineRun
metadata:
  name: odh-operator-v3-4-push
  labels:
    rhoai-version: "3.4.0-ea.1"
spec:
  params:
    - name: output-image
      value: quay.io/rhoai/odh-rhel9-operator:{{target_branch}}
    - name: build-platforms
      value:
        - linux/x86_64
        - linux-m2xlarge/arm64
    - name: rhoai-version
      value: 3.4.0-ea.1
"#;

    #[test]
    fn reads_version_from_param_and_label() {
        let (value, count) = read_rhoai_version(PIPELINERUN, "test.yaml").unwrap();
        assert_eq!(value, "3.4.0-ea.1");
        assert_eq!(count, 2);
    }

    #[test]
    fn read_fails_when_field_absent() {
        let err = read_rhoai_version("kind: PipelineRun\n", "test.yaml").unwrap_err();
        assert_eq!(err.code.as_str(), "pipelinerun.field_missing");
    }

    #[test]
    fn read_fails_when_occurrences_disagree() {
        let content = "rhoai-version: 3.4.0\n- name: rhoai-version\n  value: 3.4.1\n";
        assert!(read_rhoai_version(content, "test.yaml").is_err());
    }

    #[test]
    fn replace_touches_only_the_version_bytes() {
        let (replaced, count) = replace_rhoai_version(PIPELINERUN, "3.4.0-ea.2");
        assert_eq!(count, 2);

        let expected = PIPELINERUN.replace("3.4.0-ea.1", "3.4.0-ea.2");
        assert_eq!(replaced, expected);
    }

    #[test]
    fn parse_params_extracts_component_and_archs() {
        let params = parse_params(PIPELINERUN, "test.yaml").unwrap().unwrap();
        assert_eq!(params.component, "odh-rhel9-operator");
        let archs: Vec<&str> = params.architectures.iter().map(String::as_str).collect();
        assert_eq!(archs, vec!["amd64", "arm64"]);
    }

    #[test]
    fn parse_params_skips_files_without_build_params() {
        let content = "spec:\n  params:\n    - name: git-url\n      value: something\n";
        assert!(parse_params(content, "test.yaml").unwrap().is_none());
    }

    #[test]
    fn normalizes_platform_strings() {
        assert_eq!(normalize_architecture("linux/x86_64"), "amd64");
        assert_eq!(normalize_architecture("linux-m2xlarge/arm64"), "arm64");
        assert_eq!(normalize_architecture("linux-extra-fast/amd64"), "amd64");
        assert_eq!(normalize_architecture("ppc64le"), "ppc64le");
    }

    #[test]
    fn extracts_component_names() {
        assert_eq!(
            extract_component_name("quay.io/rhoai/odh-kserve-controller-rhel9:{{target_branch}}"),
            "odh-kserve-controller-rhel9"
        );
        assert_eq!(
            extract_component_name("quay.io/rhoai/odh-rhel9-operator:latest"),
            "odh-rhel9-operator"
        );
        assert_eq!(extract_component_name("other.registry/image"), "other.registry/image");
    }
}
