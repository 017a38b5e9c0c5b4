use chrono::{DateTime, Local};
use jsmodule_bundle::CompiledArtifact;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A compiled artifact together with where and when it was produced
#[derive(Debug, Clone)]
pub struct CachedArtifact {
    pub artifact: CompiledArtifact,
    pub output: PathBuf,
    pub compiled_at: DateTime<Local>,
}

/// Process-lifetime memo of compiled bundles.
///
/// Entries are keyed by the output path alone. A second build of the same
/// output path gets the first artifact back even if its sources have
/// changed since; callers that need fresh output must skip the cache.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: HashMap<String, CachedArtifact>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for an output path (SHA-256 of the path text)
    pub fn key_for(output: &Path) -> String {
        let mut hasher = Sha256::new();
        hasher.update(output.to_string_lossy().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<&CachedArtifact> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, artifact: CompiledArtifact, output: PathBuf) {
        self.entries.insert(
            key,
            CachedArtifact {
                artifact,
                output,
                compiled_at: Local::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
