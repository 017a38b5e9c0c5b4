use super::{load_project, select_bundles};
use chrono::Local;
use jsmodule::build::{format_size, BuildSettings, BundleBuilder};
use jsmodule::cache::ArtifactCache;
use jsmodule::config::Config;
use jsmodule::core::JsmResult;
use std::path::Path;

pub fn run(bundle: Option<String>, strip_debug: bool, no_cache: bool) -> JsmResult<()> {
    let (current_dir, project_root, manifest) = load_project()?;
    let config = Config::load()?;

    let settings = BuildSettings {
        force_strip_debug: strip_debug || config.strip_debug,
        max_resolution_depth: Some(config.resolution_depth(manifest.max_resolution_depth)),
    };
    let builder = BundleBuilder::new(project_root, current_dir.clone(), &manifest, settings);

    // One cache per invocation; repeated output paths are served from it
    let mut cache = ArtifactCache::new();
    let use_cache = config.use_cache && !no_cache;

    for target in select_bundles(&manifest, bundle.as_deref())? {
        let outcome = builder.build(target, use_cache.then_some(&mut cache))?;

        let shown = display_path(&outcome.output, &current_dir);
        let suffix = if outcome.from_cache { " (from cache)" } else { "" };
        println!(
            "✓ [{}] Reconciled {} files for {} ({}){}",
            Local::now().format("%B %d, %y %H:%M:%S"),
            outcome.artifact.unit_count,
            shown,
            format_size(outcome.artifact.len()),
            suffix
        );

        if config.report_pruned && !outcome.pruned.is_empty() {
            println!("  Pruned {} unreferenced file(s):", outcome.pruned.len());
            for path in &outcome.pruned {
                println!("    - {}", display_path(Path::new(path), &current_dir));
            }
        }
    }

    Ok(())
}

/// Path relative to the working directory when one exists
fn display_path(path: &Path, current_dir: &Path) -> String {
    pathdiff::diff_paths(path, current_dir)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
