// Public modules
pub mod arch_table;
pub mod bump;
pub mod error;
pub mod git;
pub mod pipelinerun;
pub mod renovate;
pub mod replicate;
pub mod version;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
