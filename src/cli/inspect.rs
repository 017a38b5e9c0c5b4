use super::{load_project, select_bundles};
use jsmodule::build::{BuildSettings, BundleBuilder};
use jsmodule::config::Config;
use jsmodule::core::{JsmError, JsmResult};
use jsmodule_bundle::UnitSummary;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct BundleReport<'a> {
    output: &'a str,
    units: Vec<UnitSummary>,
}

pub fn run(bundle: Option<String>, json: bool) -> JsmResult<()> {
    let (current_dir, project_root, manifest) = load_project()?;
    let config = Config::load()?;

    let settings = BuildSettings {
        force_strip_debug: config.strip_debug,
        max_resolution_depth: Some(config.resolution_depth(manifest.max_resolution_depth)),
    };
    let builder = BundleBuilder::new(project_root.clone(), current_dir, &manifest, settings);

    let mut reports = Vec::new();
    for target in select_bundles(&manifest, bundle.as_deref())? {
        reports.push(BundleReport {
            output: &target.output,
            units: builder.inspect(target)?,
        });
    }

    if json {
        let rendered = serde_json::to_string_pretty(&reports)
            .map_err(|e| JsmError::Config(format!("Failed to serialize report: {}", e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    for report in &reports {
        print_report(report, &project_root);
    }
    Ok(())
}

fn print_report(report: &BundleReport, project_root: &Path) {
    println!("{}", report.output);
    if report.units.is_empty() {
        println!("  (no source files)");
        return;
    }

    for unit in &report.units {
        let path = Path::new(&unit.path);
        let shown = path.strip_prefix(project_root).unwrap_or(path);

        let mut flags = Vec::new();
        if unit.is_common {
            flags.push("common");
        }
        if unit.is_test {
            flags.push("test");
        }
        if unit.pruned {
            flags.push("pruned");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        println!("  {} (refs: {}){}", shown.display(), unit.reference_count, flags);
        if !unit.provides.is_empty() {
            println!("    provides:  {}", unit.provides.join(", "));
        }
        if !unit.requires.is_empty() {
            println!("    requires:  {}", unit.requires.join(", "));
        }
        if !unit.overrides.is_empty() {
            println!("    overrides: {}", unit.overrides.join(", "));
        }
    }
}
