use crate::core::error::{JsmError, JsmResult};
use std::path::{Path, PathBuf};

/// Name of the project manifest file
pub const MANIFEST_FILE: &str = "jsmodule.yaml";

/// Get the jsmodule home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\jsmodule
/// - Linux: ~/.config/jsmodule
/// - macOS: ~/Library/Application Support/jsmodule
pub fn jsmodule_home() -> JsmResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| JsmError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("jsmodule"))
}

/// Get the user config file path
pub fn config_file() -> JsmResult<PathBuf> {
    Ok(jsmodule_home()?.join("config.yaml"))
}

/// Find the project root by looking for jsmodule.yaml in `start` or its parents
pub fn find_project_root(start: &Path) -> JsmResult<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if is_project_root(&current) {
            return Ok(current);
        }

        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            return Err(JsmError::Path(
                "Could not find jsmodule.yaml in current directory or parents".to_string(),
            ));
        }
    }
}

/// Check if a directory holds a jsmodule.yaml
pub fn is_project_root(dir: &Path) -> bool {
    dir.join(MANIFEST_FILE).exists()
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> JsmResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolve `path` against `root` unless it is already absolute
pub fn resolve_from(root: &Path, path: &str) -> PathBuf {
    let pb = PathBuf::from(path);
    if pb.is_absolute() {
        pb
    } else {
        root.join(pb)
    }
}

/// Path as a string with forward slashes, used for glob matching
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_root() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("project");
        fs::create_dir_all(&project_dir).unwrap();
        fs::write(project_dir.join(MANIFEST_FILE), "name: test\n").unwrap();

        let found = find_project_root(&project_dir.join("src").join("views")).unwrap();
        assert_eq!(found, project_dir);
        assert!(is_project_root(&found));
    }

    #[test]
    fn test_ensure_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dist").join("js");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_resolve_from() {
        let root = Path::new("/project");
        assert_eq!(resolve_from(root, "dist/app.js"), root.join("dist/app.js"));
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("src\\common\\util.js")), "src/common/util.js");
    }
}
