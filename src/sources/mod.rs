use crate::core::path::to_slash;
use crate::core::{JsmError, JsmResult};
use globset::{Glob, GlobSet, GlobSetBuilder};
use jsmodule_bundle::{FileContents, SourceFile};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Compile source patterns into one matcher
pub fn glob_set(patterns: &[String]) -> JsmResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Files under `root` whose root-relative path matches any pattern.
///
/// Hidden directories are not descended into. Results are sorted so the
/// registration order is stable between runs.
pub fn collect(root: &Path, patterns: &[String]) -> JsmResult<Vec<PathBuf>> {
    let matcher = glob_set(patterns)?;
    let mut files = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !entry
                .file_name()
                .to_str()
                .map(|name| name.starts_with('.'))
                .unwrap_or(false)
    });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).map_err(|_| {
            JsmError::Path(format!(
                "Path {} is not within project root {}",
                entry.path().display(),
                root.display()
            ))
        })?;
        if matcher.is_match(to_slash(relative)) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Read a file into a buffered source unit.
///
/// A zero-length file is still buffered content and becomes a unit of its own.
pub fn load(path: &Path, base: &Path, cwd: &Path) -> JsmResult<SourceFile> {
    let bytes = fs::read(path)?;

    Ok(SourceFile {
        path: path.to_string_lossy().into_owned(),
        base: base.to_string_lossy().into_owned(),
        cwd: cwd.to_string_lossy().into_owned(),
        contents: FileContents::Buffered(bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_collect_matches_globs_in_order() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/b.js", "b");
        touch(temp.path(), "src/a.js", "a");
        touch(temp.path(), "src/views/cart.html", "<p/>");
        touch(temp.path(), "src/readme.md", "docs");
        touch(temp.path(), "src/.cache/skip.js", "skip");

        let files = collect(
            temp.path(),
            &["src/**/*.js".to_string(), "src/**/*.html".to_string()],
        )
        .unwrap();
        let relative: Vec<String> = files
            .iter()
            .map(|f| to_slash(f.strip_prefix(temp.path()).unwrap()))
            .collect();
        assert_eq!(relative, vec!["src/a.js", "src/b.js", "src/views/cart.html"]);
    }

    #[test]
    fn test_load_zero_length_file_is_buffered() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/empty.js", "");

        let file = load(&temp.path().join("src/empty.js"), temp.path(), temp.path()).unwrap();
        assert!(matches!(file.contents, FileContents::Buffered(ref bytes) if bytes.is_empty()));
        assert_eq!(file.text().unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_load_buffered_file() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/a.js", "var a;");

        let file = load(&temp.path().join("src/a.js"), temp.path(), temp.path()).unwrap();
        assert_eq!(file.text().unwrap().as_deref(), Some("var a;"));
        assert!(file.path.ends_with("a.js"));
    }
}
