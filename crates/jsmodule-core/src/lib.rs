// Core functionality
pub mod core;

// Project manifest (jsmodule.yaml)
pub mod project;

// Re-export commonly used types
pub use crate::core::{format_error_with_help, ErrorHelp, JsmError, JsmResult};
pub use project::manifest::{BundleTarget, ProjectManifest};
