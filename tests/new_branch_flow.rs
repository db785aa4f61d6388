use std::fs;
use std::path::Path;

use konfluxctl::replicate::{self, ReplicateOptions};
use tempfile::TempDir;

const SOURCE_PIPELINE: &str = r#"apiVersion: tekton.dev/v1
kind: PipelineRun
metadata:
  name: odh-operator-v3-3-push
  annotations:
    pipelinesascode.tekton.dev/on-cel-expression: target_branch == "rhoai-3.3"
  labels:
    rhoai-version: "3.3.0-ea.1"
spec:
  params:
    - name: output-image
      value: quay.io/rhoai/odh-rhel9-operator:rhoai-3.3
    - name: rhoai-version
      value: 3.3.0-ea.1
"#;

fn write_source(base: &Path, component: &str, suffix: &str) {
    let dir = base.join("pipelineruns").join(component).join(".tekton");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{}-v3-3-{}.yaml", component, suffix)),
        SOURCE_PIPELINE,
    )
    .unwrap();
}

fn options(base: &Path) -> ReplicateOptions {
    ReplicateOptions {
        source_branch: "rhoai-3.3".to_string(),
        target_branch: "rhoai-3.4".to_string(),
        base_dir: base.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn replicates_files_with_renamed_tokens() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), "odh-operator", "push");
    write_source(temp.path(), "odh-operator", "scheduled");

    let result = replicate::run(&options(temp.path())).unwrap();
    assert_eq!(result.files.len(), 2);

    let target = temp
        .path()
        .join("pipelineruns/odh-operator/.tekton/odh-operator-v3-4-push.yaml");
    let content = fs::read_to_string(&target).unwrap();

    assert!(!content.contains("v3-3"));
    assert!(!content.contains("3.3"));
    assert!(content.contains("name: odh-operator-v3-4-push"));
    assert!(content.contains("target_branch == \"rhoai-3.4\""));
    assert!(content.contains("value: 3.4.0-ea.1"));
    assert!(content.contains("odh-rhel9-operator:rhoai-3.4"));

    // Source files are untouched
    let source = temp
        .path()
        .join("pipelineruns/odh-operator/.tekton/odh-operator-v3-3-push.yaml");
    assert_eq!(fs::read_to_string(&source).unwrap(), SOURCE_PIPELINE);
}

#[test]
fn reports_substitution_counts() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), "odh-operator", "push");

    let result = replicate::run(&options(temp.path())).unwrap();
    let file = &result.files[0];
    assert_eq!(file.file_token_substitutions, 1);
    // "rhoai-3.3" twice, "3.3.0-ea.1" twice
    assert_eq!(file.version_token_substitutions, 4);
    assert!(file.target.ends_with("odh-operator-v3-4-push.yaml"));
}

#[test]
fn refuses_existing_targets_without_force() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), "odh-operator", "push");

    let target = temp
        .path()
        .join("pipelineruns/odh-operator/.tekton/odh-operator-v3-4-push.yaml");
    fs::write(&target, "existing\n").unwrap();

    let err = replicate::run(&options(temp.path())).unwrap_err();
    assert_eq!(err.code.as_str(), "validation.invalid_argument");
    assert_eq!(fs::read_to_string(&target).unwrap(), "existing\n");

    let mut opts = options(temp.path());
    opts.force = true;
    replicate::run(&opts).unwrap();
    assert!(fs::read_to_string(&target).unwrap().contains("v3-4"));
}

#[test]
fn dry_run_creates_nothing() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), "odh-operator", "push");

    let mut opts = options(temp.path());
    opts.dry_run = true;
    let result = replicate::run(&opts).unwrap();

    assert!(result.dry_run);
    assert_eq!(result.files.len(), 1);
    assert!(!temp
        .path()
        .join("pipelineruns/odh-operator/.tekton/odh-operator-v3-4-push.yaml")
        .exists());
}

#[test]
fn rejects_identical_source_and_target() {
    let temp = TempDir::new().unwrap();
    write_source(temp.path(), "odh-operator", "push");

    let mut opts = options(temp.path());
    opts.target_branch = "rhoai-3.3".to_string();
    assert!(replicate::run(&opts).is_err());
}

#[test]
fn fails_when_source_branch_has_no_files() {
    let temp = TempDir::new().unwrap();

    let err = replicate::run(&options(temp.path())).unwrap_err();
    assert_eq!(err.code.as_str(), "pipelinerun.not_found");
}
