use crate::core::path::MANIFEST_FILE;
use crate::core::{JsmError, JsmResult};
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Default for bundles that do not set `strip_debug` themselves
    #[serde(default)]
    pub strip_debug: bool,
    #[serde(default = "default_max_resolution_depth")]
    pub max_resolution_depth: usize,
    #[serde(default)]
    pub bundles: Vec<BundleTarget>,
}

fn default_max_resolution_depth() -> usize {
    256
}

/// One output file and the sources folded into it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleTarget {
    /// Output path, relative to the project root
    pub output: String,
    /// Glob patterns selecting the source units
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_debug: Option<bool>,
    /// Replacement sources, applied in order after registration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<String>,
}

impl BundleTarget {
    /// Effective debug-stripping flag, falling back to the manifest default
    pub fn strip_debug_or(&self, default: bool) -> bool {
        self.strip_debug.unwrap_or(default)
    }
}

impl ProjectManifest {
    /// Load jsmodule.yaml from a directory
    pub fn load(dir: &Path) -> JsmResult<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(JsmError::Manifest(format!(
                "jsmodule.yaml not found in {}",
                dir.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        let manifest: ProjectManifest = serde_yaml::from_str(&content)
            .map_err(|e| JsmError::Manifest(format!("Failed to parse jsmodule.yaml: {}", e)))?;

        manifest.validate()?;

        Ok(manifest)
    }

    /// Validate the manifest
    pub fn validate(&self) -> JsmResult<()> {
        if self.name.is_empty() {
            return Err(JsmError::Manifest(
                "Project name cannot be empty".to_string(),
            ));
        }

        if self.max_resolution_depth == 0 {
            return Err(JsmError::Manifest(
                "max_resolution_depth must be greater than zero".to_string(),
            ));
        }

        if self.bundles.is_empty() {
            return Err(JsmError::Manifest(
                "At least one bundle must be declared".to_string(),
            ));
        }

        for bundle in &self.bundles {
            if bundle.output.is_empty() {
                return Err(JsmError::Manifest(
                    "Bundle output cannot be empty".to_string(),
                ));
            }
            if bundle.sources.is_empty() {
                return Err(JsmError::Manifest(format!(
                    "Bundle '{}' has no source patterns",
                    bundle.output
                )));
            }
            for pattern in &bundle.sources {
                Glob::new(pattern)?;
            }
        }

        Ok(())
    }

    /// Save jsmodule.yaml to a directory
    pub fn save(&self, dir: &Path) -> JsmResult<()> {
        let path = dir.join(MANIFEST_FILE);
        let content = serde_yaml::to_string(self)
            .map_err(|e| JsmError::Manifest(format!("Failed to serialize jsmodule.yaml: {}", e)))?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Create a starter manifest with a single bundle over `src/`
    pub fn default(name: String) -> Self {
        Self {
            name: name.clone(),
            description: None,
            strip_debug: false,
            max_resolution_depth: default_max_resolution_depth(),
            bundles: vec![BundleTarget {
                output: format!("dist/{}.js", name),
                sources: vec!["src/**/*.js".to_string(), "src/**/*.html".to_string()],
                strip_debug: None,
                replace: Vec::new(),
            }],
        }
    }

    /// Find a bundle by its output path
    pub fn bundle(&self, output: &str) -> JsmResult<&BundleTarget> {
        self.bundles
            .iter()
            .find(|b| b.output == output)
            .ok_or_else(|| JsmError::Manifest(format!("No bundle with output '{}'", output)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest_content = r#"
name: storefront
strip_debug: true
bundles:
  - output: dist/app.js
    sources: ["src/**/*.js"]
    replace: ["overrides/cart.js"]
  - output: dist/admin.js
    sources: ["admin/**/*.js"]
    strip_debug: false
"#;
        fs::write(temp.path().join(MANIFEST_FILE), manifest_content).unwrap();

        let manifest = ProjectManifest::load(temp.path()).unwrap();
        assert_eq!(manifest.name, "storefront");
        assert_eq!(manifest.max_resolution_depth, 256);
        assert_eq!(manifest.bundles.len(), 2);
        assert!(manifest.bundles[0].strip_debug_or(manifest.strip_debug));
        assert!(!manifest.bundles[1].strip_debug_or(manifest.strip_debug));
        assert_eq!(manifest.bundles[0].replace, vec!["overrides/cart.js"]);
    }

    #[test]
    fn test_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let err = ProjectManifest::load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("jsmodule.yaml not found"));
    }

    #[test]
    fn test_validate_rejects_empty_sources() {
        let mut manifest = ProjectManifest::default("app".to_string());
        manifest.bundles[0].sources.clear();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut manifest = ProjectManifest::default("app".to_string());
        manifest.bundles[0].sources = vec!["src/[".to_string()];
        assert!(matches!(manifest.validate(), Err(JsmError::Glob(_))));
    }

    #[test]
    fn test_save_and_find_bundle() {
        let temp = TempDir::new().unwrap();
        let manifest = ProjectManifest::default("app".to_string());
        manifest.save(temp.path()).unwrap();

        let loaded = ProjectManifest::load(temp.path()).unwrap();
        assert!(loaded.bundle("dist/app.js").is_ok());
        assert!(loaded.bundle("dist/other.js").is_err());
    }
}
