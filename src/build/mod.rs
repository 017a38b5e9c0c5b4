//! Drives one compilation pass per bundle target: collect sources,
//! register them, apply replacements, compile and write the output.

use crate::cache::ArtifactCache;
use crate::core::path::{ensure_dir, resolve_from};
use crate::core::{BundleTarget, JsmError, JsmResult, ProjectManifest};
use crate::sources;
use jsmodule_bundle::{CompileOptions, CompiledArtifact, Compiler, ErrorHandler, UnitSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-run knobs that sit on top of the manifest
#[derive(Debug, Clone, Default)]
pub struct BuildSettings {
    /// Forces debug stripping on for every bundle
    pub force_strip_debug: bool,
    /// Replaces the manifest's max_resolution_depth
    pub max_resolution_depth: Option<usize>,
}

/// Result of building one bundle
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub output: PathBuf,
    pub artifact: CompiledArtifact,
    /// Number of source files registered for this pass
    pub registered: usize,
    pub pruned: Vec<String>,
    pub from_cache: bool,
}

/// Builds the bundles of one project
pub struct BundleBuilder<'a> {
    root: PathBuf,
    cwd: PathBuf,
    manifest: &'a ProjectManifest,
    settings: BuildSettings,
}

impl<'a> BundleBuilder<'a> {
    pub fn new(root: PathBuf, cwd: PathBuf, manifest: &'a ProjectManifest, settings: BuildSettings) -> Self {
        Self {
            root,
            cwd,
            manifest,
            settings,
        }
    }

    fn compile_options(&self, target: &BundleTarget) -> CompileOptions {
        CompileOptions {
            strip_debug: self.settings.force_strip_debug
                || target.strip_debug_or(self.manifest.strip_debug),
            max_depth: self
                .settings
                .max_resolution_depth
                .unwrap_or(self.manifest.max_resolution_depth),
        }
    }

    /// Register every source of `target` into a fresh compiler
    fn register(&self, target: &BundleTarget) -> JsmResult<Compiler> {
        let error_handler: ErrorHandler = Box::new(|e: &JsmError| {
            tracing::error!("{}", e);
        });
        let mut compiler =
            Compiler::new(self.compile_options(target))?.with_error_handler(error_handler);

        let files = sources::collect(&self.root, &target.sources)?;
        debug!("{} source files match {:?}", files.len(), target.sources);
        for path in files {
            let file = sources::load(&path, &self.root, &self.cwd)?;
            compiler.add_file(file)?;
        }
        Ok(compiler)
    }

    /// Read each replacement source and fold it into the registry, in order
    fn apply_replacements(&self, compiler: &mut Compiler, target: &BundleTarget) -> JsmResult<()> {
        for replacement in &target.replace {
            let path = resolve_from(&self.root, replacement);
            let text = fs::read_to_string(&path)?;
            let replaced = compiler.integrate_replacement(&text, replacement);
            debug!("{} replaced {} module(s)", replacement, replaced);
        }
        Ok(())
    }

    /// Build one bundle, consulting `cache` by output path when given
    pub fn build(&self, target: &BundleTarget, cache: Option<&mut ArtifactCache>) -> JsmResult<BuildOutcome> {
        let mut compiler = self.register(target)?;
        let registered = compiler.registry().len();
        let output = resolve_from(&self.root, &target.output);
        let key = ArtifactCache::key_for(&output);

        if let Some(hit) = cache.as_ref().and_then(|c| c.get(&key)) {
            info!("Serving {} from cache", target.output);
            let artifact = hit.artifact.clone();
            write_output(&output, &artifact)?;
            return Ok(BuildOutcome {
                output,
                artifact,
                registered,
                pruned: Vec::new(),
                from_cache: true,
            });
        }

        self.apply_replacements(&mut compiler, target)?;
        compiler.resolve()?;
        let pruned: Vec<String> = compiler
            .registry()
            .units()
            .iter()
            .filter(|u| !u.survives_pruning())
            .map(|u| u.path().to_string())
            .collect();
        let artifact = compiler.compile()?;

        write_output(&output, &artifact)?;
        if let Some(cache) = cache {
            cache.insert(key, artifact.clone(), output.clone());
        }

        Ok(BuildOutcome {
            output,
            artifact,
            registered,
            pruned,
            from_cache: false,
        })
    }

    /// Register, replace and resolve without emitting; units in registration order
    pub fn inspect(&self, target: &BundleTarget) -> JsmResult<Vec<UnitSummary>> {
        let mut compiler = self.register(target)?;
        self.apply_replacements(&mut compiler, target)?;
        compiler.resolve()?;
        Ok(compiler
            .registry()
            .units()
            .iter()
            .map(|u| u.summary())
            .collect())
    }
}

fn write_output(output: &Path, artifact: &CompiledArtifact) -> JsmResult<()> {
    if let Some(parent) = output.parent() {
        ensure_dir(parent)?;
    }
    fs::write(output, &artifact.contents)?;
    Ok(())
}

/// Human-readable size: bytes below 1 KB, then KB, then MB from 1000 KB
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes >= 1024 * 1000 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1000.0))
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}
