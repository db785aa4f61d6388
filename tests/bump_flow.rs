use std::fs;
use std::path::Path;

use konfluxctl::bump::{self, BumpOptions};
use tempfile::TempDir;

const PUSH_PIPELINE: &str = r#"apiVersion: tekton.dev/v1
kind: PipelineRun
metadata:
  name: odh-operator-v3-4-push
  labels:
    rhoai-version: "3.4.0-ea.1"
spec:
  params:
    - name: output-image
      value: quay.io/rhoai/odh-rhel9-operator:{{target_branch}}
    - name: rhoai-version
      value: 3.4.0-ea.1
    - name: git-url
      value: '{{source_url}}'
"#;

const SCHEDULED_PIPELINE: &str = r#"apiVersion: tekton.dev/v1
kind: PipelineRun
metadata:
  name: odh-operator-v3-4-scheduled
spec:
  params:
    - name: rhoai-version
      value: 3.4.0-ea.1
"#;

fn write_pipeline(base: &Path, component: &str, suffix: &str, content: &str) {
    let dir = base.join("pipelineruns").join(component).join(".tekton");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}-v3-4-{}.yaml", component, suffix)), content).unwrap();
}

fn options(base: &Path, version: &str) -> BumpOptions {
    BumpOptions {
        branch: "rhoai-3.4".to_string(),
        version: version.to_string(),
        base_dir: base.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn ea_bump_changes_only_the_version_field() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);
    write_pipeline(temp.path(), "odh-operator", "scheduled", SCHEDULED_PIPELINE);

    let result = bump::run(&options(temp.path(), "3.4.0-ea.2")).unwrap();

    assert_eq!(result.old_version, "3.4.0-ea.1");
    assert_eq!(result.new_version, "3.4.0-ea.2");
    assert_eq!(result.kind, "early_access");
    assert!(!result.first_ea);
    assert_eq!(result.files.len(), 2);

    let rewritten = fs::read_to_string(
        temp.path()
            .join("pipelineruns/odh-operator/.tekton/odh-operator-v3-4-push.yaml"),
    )
    .unwrap();

    // Everything except the version occurrences is byte-identical
    assert_eq!(rewritten, PUSH_PIPELINE.replace("3.4.0-ea.1", "3.4.0-ea.2"));
}

#[test]
fn dry_run_leaves_files_untouched() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);

    let mut opts = options(temp.path(), "3.4.0");
    opts.dry_run = true;
    let result = bump::run(&opts).unwrap();

    assert!(result.dry_run);
    assert_eq!(result.kind, "ga");

    let content = fs::read_to_string(
        temp.path()
            .join("pipelineruns/odh-operator/.tekton/odh-operator-v3-4-push.yaml"),
    )
    .unwrap();
    assert_eq!(content, PUSH_PIPELINE);
}

#[test]
fn component_filter_restricts_the_bump() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);
    write_pipeline(temp.path(), "odh-dashboard", "push", SCHEDULED_PIPELINE);

    let mut opts = options(temp.path(), "3.4.0-ea.2");
    opts.component = Some("odh-operator".to_string());
    let result = bump::run(&opts).unwrap();

    assert_eq!(result.files.len(), 1);
    let untouched = fs::read_to_string(
        temp.path()
            .join("pipelineruns/odh-dashboard/.tekton/odh-dashboard-v3-4-push.yaml"),
    )
    .unwrap();
    assert_eq!(untouched, SCHEDULED_PIPELINE);
}

#[test]
fn rejects_version_outside_the_branch_line() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);

    let err = bump::run(&options(temp.path(), "3.5.0")).unwrap_err();
    assert_eq!(err.code.as_str(), "version.branch_mismatch");
}

#[test]
fn rejects_non_monotonic_target() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);

    let err = bump::run(&options(temp.path(), "3.4.0-ea.1")).unwrap_err();
    assert_eq!(err.code.as_str(), "version.not_monotonic");

    // A hotfix of the current EA is monotonic
    let result = bump::run(&options(temp.path(), "3.4.0-ea.1.1")).unwrap();
    assert_eq!(result.kind, "early_access_hotfix");
}

#[test]
fn fails_when_no_files_match_the_branch() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);

    let mut opts = options(temp.path(), "3.5.0");
    opts.branch = "rhoai-3.5".to_string();
    let err = bump::run(&opts).unwrap_err();
    assert_eq!(err.code.as_str(), "pipelinerun.not_found");
}

#[test]
fn fails_when_files_disagree_on_current_version() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);
    write_pipeline(
        temp.path(),
        "odh-dashboard",
        "push",
        &SCHEDULED_PIPELINE.replace("3.4.0-ea.1", "3.4.0"),
    );

    assert!(bump::run(&options(temp.path(), "3.4.1")).is_err());
}

#[test]
fn bumps_build_config_alongside_pipelines() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);

    let build_config = temp.path().join("config.yaml");
    fs::write(&build_config, "product: rhoai\nrhoai-version: 3.4.0-ea.1\n").unwrap();

    let mut opts = options(temp.path(), "3.4.0-ea.2");
    opts.build_config = Some(build_config.clone());
    let result = bump::run(&opts).unwrap();

    let info = result.build_config.unwrap();
    assert_eq!(info.occurrences, 1);
    assert_eq!(
        fs::read_to_string(&build_config).unwrap(),
        "product: rhoai\nrhoai-version: 3.4.0-ea.2\n"
    );
}

#[test]
fn stage_includes_the_build_config() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);

    let build_config = temp.path().join("config.yaml");
    fs::write(&build_config, "rhoai-version: 3.4.0-ea.1\n").unwrap();

    let git = |args: &[&str]| {
        std::process::Command::new("git")
            .args(args)
            .current_dir(temp.path())
            .output()
            .unwrap()
    };
    git(&["init", "-q"]);

    let mut opts = options(temp.path(), "3.4.0-ea.2");
    opts.build_config = Some(build_config);
    opts.stage = true;
    let result = bump::run(&opts).unwrap();
    assert!(result.staged);

    let index = git(&["ls-files", "--cached"]);
    let index = String::from_utf8_lossy(&index.stdout).to_string();
    assert!(index.contains("config.yaml"), "index: {}", index);
    assert!(
        index.contains("pipelineruns/odh-operator/.tekton/odh-operator-v3-4-push.yaml"),
        "index: {}",
        index
    );
}

#[test]
fn build_config_version_mismatch_is_fatal() {
    let temp = TempDir::new().unwrap();
    write_pipeline(temp.path(), "odh-operator", "push", PUSH_PIPELINE);

    let build_config = temp.path().join("config.yaml");
    fs::write(&build_config, "version: 3.3.0\n").unwrap();

    let mut opts = options(temp.path(), "3.4.0-ea.2");
    opts.build_config = Some(build_config);
    assert!(bump::run(&opts).is_err());
}
