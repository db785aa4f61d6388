use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidToml,

    ValidationInvalidArgument,

    VersionInvalid,
    BranchInvalid,
    VersionBranchMismatch,
    VersionNotMonotonic,

    PipelineRunNotFound,
    PipelineRunFieldMissing,

    GitCommandFailed,
    GitBranchNotFound,

    InternalIoError,
    InternalYamlError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidToml => "config.invalid_toml",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::VersionInvalid => "version.invalid",
            ErrorCode::BranchInvalid => "branch.invalid",
            ErrorCode::VersionBranchMismatch => "version.branch_mismatch",
            ErrorCode::VersionNotMonotonic => "version.not_monotonic",

            ErrorCode::PipelineRunNotFound => "pipelinerun.not_found",
            ErrorCode::PipelineRunFieldMissing => "pipelinerun.field_missing",

            ErrorCode::GitCommandFailed => "git.command_failed",
            ErrorCode::GitBranchNotFound => "git.branch_not_found",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalYamlError => "internal.yaml_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidFormatDetails {
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchMismatchDetails {
    pub branch: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    fn with_details<D: Serialize>(code: ErrorCode, message: impl Into<String>, details: D) -> Self {
        let details =
            serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(code, message, details)
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::with_details(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            InvalidArgumentDetails {
                field: field.into(),
                problem: problem.into(),
                value,
            },
        )
    }

    pub fn version_invalid(value: impl Into<String>) -> Self {
        Self::with_details(
            ErrorCode::VersionInvalid,
            "Version does not match any supported format",
            InvalidFormatDetails {
                value: value.into(),
                expected: "X.Y.Z, X.Y.Z-ea.N, or X.Y.Z-ea.N.H",
            },
        )
        .with_hint("Supported shapes: GA 3.4.0, EA 3.4.0-ea.1, EA hotfix 3.4.0-ea.1.1")
    }

    pub fn branch_invalid(value: impl Into<String>) -> Self {
        Self::with_details(
            ErrorCode::BranchInvalid,
            "Branch name does not match the release branch format",
            InvalidFormatDetails {
                value: value.into(),
                expected: "rhoai-X.Y",
            },
        )
        .with_hint("Release branches look like rhoai-3.4")
    }

    pub fn version_branch_mismatch(branch: impl Into<String>, version: impl Into<String>) -> Self {
        let branch = branch.into();
        let version = version.into();
        Self::with_details(
            ErrorCode::VersionBranchMismatch,
            format!(
                "Version {} does not belong to branch {} (major.minor must match)",
                version, branch
            ),
            BranchMismatchDetails { branch, version },
        )
    }

    pub fn version_not_monotonic(old: impl Into<String>, new: impl Into<String>) -> Self {
        let old = old.into();
        let new = new.into();
        Self::with_details(
            ErrorCode::VersionNotMonotonic,
            format!("Target version {} is not newer than current version {}", new, old),
            serde_json::json!({ "current": old, "target": new }),
        )
    }

    pub fn pipelinerun_not_found(pattern: impl Into<String>) -> Self {
        Self::with_details(
            ErrorCode::PipelineRunNotFound,
            "No PipelineRun files found",
            serde_json::json!({ "pattern": pattern.into() }),
        )
        .with_hint("Expected layout: pipelineruns/<component>/.tekton/<component>-vX-Y-{push,scheduled}.yaml")
    }

    pub fn pipelinerun_field_missing(file: impl Into<String>, field: impl Into<String>) -> Self {
        let file = file.into();
        let field = field.into();
        Self::with_details(
            ErrorCode::PipelineRunFieldMissing,
            format!("No {} value found in {}", field, file),
            serde_json::json!({ "file": file, "field": field }),
        )
    }

    pub fn git_command_failed(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::GitCommandFailed,
            message,
            Value::Object(serde_json::Map::new()),
        )
    }

    pub fn git_branch_not_found(branch: impl Into<String>) -> Self {
        Self::with_details(
            ErrorCode::GitBranchNotFound,
            "Git branch not found",
            serde_json::json!({ "branch": branch.into() }),
        )
        .with_hint("Run 'git fetch origin' to update remote branches")
    }

    pub fn config_invalid_toml(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::with_details(
            ErrorCode::ConfigInvalidToml,
            "Invalid TOML in configuration",
            serde_json::json!({ "path": path.into(), "error": err.to_string() }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::with_details(
            ErrorCode::InternalIoError,
            "IO error",
            InternalIoErrorDetails {
                error: error.into(),
                context,
            },
        )
    }

    pub fn internal_yaml(error: impl Into<String>, context: Option<String>) -> Self {
        Self::with_details(
            ErrorCode::InternalYamlError,
            "YAML error",
            serde_json::json!({ "error": error.into(), "context": context }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::with_details(
            ErrorCode::InternalJsonError,
            "JSON error",
            serde_json::json!({ "error": error.into(), "context": context }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
