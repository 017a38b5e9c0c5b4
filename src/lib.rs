//! jsmodule: build single-file script bundles from self-describing modules.
//!
//! This crate provides the command-line side of jsmodule, re-exporting core
//! functionality from `jsmodule-core` and wiring the `jsmodule-bundle`
//! compiler to the filesystem.

pub use jsmodule_core::{format_error_with_help, ErrorHelp, JsmError, JsmResult};
pub use jsmodule_core::{BundleTarget, ProjectManifest};

/// Core module re-exported for convenience.
pub mod core {
    pub use jsmodule_core::*;
    pub use jsmodule_core::core::*;

    /// Path module re-exported from jsmodule-core.
    pub mod path {
        pub use jsmodule_core::core::path::*;
    }
}

/// User-level configuration.
pub mod config;

/// In-process artifact cache.
pub mod cache;

/// Source discovery and loading.
pub mod sources;

/// Bundle builds.
pub mod build;
