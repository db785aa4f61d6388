//! TOML exception config for the architecture table.
//!
//! ```toml
//! [accelerator_incompatibility_rules]
//! cuda = ["ppc64le", "s390x"]
//!
//! [[exception]]
//! component = "odh-dashboard-rhel9"
//! architectures = ["s390x"]
//! issue = "https://issues.redhat.com/browse/RHOAIENG-12345"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::log_status;
use crate::utils::io;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchTableConfig {
    /// Accelerator name substring -> architectures it can never build on.
    #[serde(default)]
    pub accelerator_incompatibility_rules: BTreeMap<String, Vec<String>>,

    #[serde(default, rename = "exception")]
    pub exceptions: Vec<ExceptionRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExceptionRule {
    pub component: String,
    #[serde(default)]
    pub architectures: Vec<String>,
    #[serde(default)]
    pub issue: Option<String>,
}

impl ArchTableConfig {
    /// Load the config. A missing file yields the empty default (every
    /// gap renders as an unexplained blank cell); a malformed file is
    /// fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log_status!("arch-table", "Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = io::read_file(path, "read arch-table config")?;
        toml::from_str(&content).map_err(|e| Error::config_invalid_toml(path.display().to_string(), e))
    }

    /// First accelerator whose name appears as a substring of the
    /// component name (case-insensitive on the component side).
    pub fn detect_accelerator(&self, component: &str) -> Option<&str> {
        let component = component.to_lowercase();
        self.accelerator_incompatibility_rules
            .keys()
            .find(|accelerator| component.contains(accelerator.as_str()))
            .map(String::as_str)
    }

    pub fn is_accelerator_incompatible(&self, component: &str, arch: &str) -> bool {
        self.detect_accelerator(component)
            .and_then(|accelerator| self.accelerator_incompatibility_rules.get(accelerator))
            .is_some_and(|archs| archs.iter().any(|a| a == arch))
    }

    pub fn exception_for(&self, component: &str, arch: &str) -> Option<&ExceptionRule> {
        self.exceptions.iter().find(|exception| {
            exception.component == component && exception.architectures.iter().any(|a| a == arch)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ArchTableConfig {
        toml::from_str(
            r#"
            [accelerator_incompatibility_rules]
            cuda = ["ppc64le", "s390x"]
            rocm = ["ppc64le"]

            [[exception]]
            component = "odh-dashboard-rhel9"
            architectures = ["s390x"]
            issue = "https://issues.redhat.com/browse/RHOAIENG-12345"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn detects_accelerator_from_component_name() {
        let config = config();
        assert_eq!(
            config.detect_accelerator("odh-cuda-notebook-rhel9"),
            Some("cuda")
        );
        assert_eq!(config.detect_accelerator("ODH-CUDA-NOTEBOOK"), Some("cuda"));
        assert_eq!(config.detect_accelerator("odh-dashboard"), None);
    }

    #[test]
    fn accelerator_rule_applies_per_arch() {
        let config = config();
        assert!(config.is_accelerator_incompatible("odh-cuda-notebook", "ppc64le"));
        assert!(!config.is_accelerator_incompatible("odh-cuda-notebook", "arm64"));
        assert!(!config.is_accelerator_incompatible("odh-dashboard", "ppc64le"));
    }

    #[test]
    fn exception_matches_component_and_arch() {
        let config = config();
        assert!(config.exception_for("odh-dashboard-rhel9", "s390x").is_some());
        assert!(config.exception_for("odh-dashboard-rhel9", "ppc64le").is_none());
        assert!(config.exception_for("other", "s390x").is_none());
    }
}
