use jsmodule::core::path::{find_project_root, MANIFEST_FILE};
use jsmodule::core::{JsmError, JsmResult, ProjectManifest};
use dialoguer::Input;
use std::env;

pub fn run(name: Option<String>, yes: bool) -> JsmResult<()> {
    let current_dir = env::current_dir()
        .map_err(|e| JsmError::Path(format!("Failed to get current directory: {}", e)))?;

    // Check if we're already in a project
    if find_project_root(&current_dir).is_ok() {
        return Err(JsmError::Manifest(format!(
            "Already in a jsmodule project ({} exists)",
            MANIFEST_FILE
        )));
    }

    // Get project name from directory
    let default_project_name = current_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my-project")
        .to_string();

    let project_name = match name {
        Some(name) => name,
        None if yes => default_project_name,
        None => prompt_name(&default_project_name)?,
    };
    validate_name(&project_name)?;

    let manifest = ProjectManifest::default(project_name.clone());
    manifest.save(&current_dir)?;

    println!("✓ Created {} for {}", MANIFEST_FILE, project_name);
    for target in &manifest.bundles {
        println!("  {} <- {}", target.output, target.sources.join(", "));
    }
    Ok(())
}

fn prompt_name(default: &str) -> JsmResult<String> {
    Input::new()
        .with_prompt("Project name")
        .default(default.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            validate_name(input).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(|e| JsmError::Config(format!("Failed to read input: {}", e)))
}

fn validate_name(name: &str) -> JsmResult<()> {
    if name.is_empty() {
        return Err(JsmError::Manifest("Project name cannot be empty".to_string()));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(JsmError::Manifest(
            "Project name can only contain alphanumeric characters, hyphens, underscores and dots"
                .to_string(),
        ));
    }
    Ok(())
}
