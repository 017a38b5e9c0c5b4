pub mod build;
pub mod init;
pub mod inspect;

use jsmodule::core::path::find_project_root;
use jsmodule::core::{BundleTarget, JsmError, JsmResult, ProjectManifest};
use std::env;
use std::path::PathBuf;

/// Current directory, the project root above it, and its manifest
pub(crate) fn load_project() -> JsmResult<(PathBuf, PathBuf, ProjectManifest)> {
    let current_dir = env::current_dir()
        .map_err(|e| JsmError::Path(format!("Failed to get current directory: {}", e)))?;

    let project_root = find_project_root(&current_dir)?;
    let manifest = ProjectManifest::load(&project_root)?;
    Ok((current_dir, project_root, manifest))
}

/// Bundles selected by `--bundle`, or all of them
pub(crate) fn select_bundles<'m>(
    manifest: &'m ProjectManifest,
    bundle: Option<&str>,
) -> JsmResult<Vec<&'m BundleTarget>> {
    match bundle {
        Some(output) => Ok(vec![manifest.bundle(output)?]),
        None => Ok(manifest.bundles.iter().collect()),
    }
}
