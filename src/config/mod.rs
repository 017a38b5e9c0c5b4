use crate::core::path::{config_file, ensure_dir};
use crate::core::{JsmError, JsmResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// User-level settings shared by every project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Serve repeated builds of the same output path from the in-process cache
    #[serde(default = "default_true")]
    pub use_cache: bool,

    /// List the units dropped by pruning after each build
    #[serde(default)]
    pub report_pruned: bool,

    /// Strip pragma:DEBUG spans from every bundle of every project
    #[serde(default)]
    pub strip_debug: bool,

    /// Overrides the manifest's max_resolution_depth when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resolution_depth: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_cache: true,
            report_pruned: false,
            strip_debug: false,
            max_resolution_depth: None,
        }
    }
}

impl Config {
    /// Load config from the platform config directory, creating a default one if missing
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\jsmodule\config.yaml
    /// - Linux: ~/.config/jsmodule/config.yaml
    /// - macOS: ~/Library/Application Support/jsmodule/config.yaml
    pub fn load() -> JsmResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> JsmResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| JsmError::Config(format!("Failed to parse config: {}", e)))?;

        if config.max_resolution_depth == Some(0) {
            return Err(JsmError::Config(
                "max_resolution_depth must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Save config to an explicit file
    pub fn save_to(&self, path: &Path) -> JsmResult<()> {
        if let Some(dir) = path.parent() {
            ensure_dir(dir)?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| JsmError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Resolution depth to use, given the project's own setting
    pub fn resolution_depth(&self, project_default: usize) -> usize {
        self.max_resolution_depth.unwrap_or(project_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.use_cache);
        assert!(!config.report_pruned);
        assert!(!config.strip_debug);
        assert_eq!(config.resolution_depth(256), 256);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("jsmodule").join("config.yaml");

        let config = Config {
            use_cache: false,
            report_pruned: true,
            strip_debug: true,
            max_resolution_depth: Some(64),
        };
        config.save_to(&config_path).unwrap();

        let loaded = Config::load_from(&config_path).unwrap();
        assert!(!loaded.use_cache);
        assert!(loaded.report_pruned);
        assert!(loaded.strip_debug);
        assert_eq!(loaded.resolution_depth(256), 64);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        fs::write(&config_path, "report_pruned: true\n").unwrap();

        let loaded = Config::load_from(&config_path).unwrap();
        assert!(loaded.use_cache);
        assert!(loaded.report_pruned);
    }

    #[test]
    fn test_config_rejects_zero_depth() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        fs::write(&config_path, "max_resolution_depth: 0\n").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }
}
