use crate::bundler::extractor::Extractor;
use crate::bundler::integrator::ReplacementIntegrator;
use crate::bundler::parser::{template_export, DirectiveParser};
use crate::bundler::planner::{BuildPlan, CompiledArtifact};
use crate::bundler::registry::UnitRegistry;
use crate::bundler::resolver::{DependencyResolver, DEFAULT_MAX_DEPTH};
use crate::bundler::template::{EjsTemplateTransform, TemplateTransform};
use crate::bundler::unit::{banner, BannerKind, SourceFile, SourceUnit, UnitKind};
use jsmodule_core::{JsmError, JsmResult};
use tracing::{debug, warn};

/// Called with every fatal error before it is returned
pub type ErrorHandler = Box<dyn Fn(&JsmError)>;

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Remove `pragma:DEBUG_START`/`pragma:DEBUG_END` spans
    pub strip_debug: bool,
    /// Longest require chain before resolution reports a cycle
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strip_debug: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// One compilation pass: register units, apply replacements, resolve, emit.
///
/// A compiler is consumed by [`Compiler::compile`]; build a new one for the
/// next pass.
pub struct Compiler {
    options: CompileOptions,
    extractor: Extractor,
    parser: DirectiveParser,
    transform: Box<dyn TemplateTransform>,
    registry: UnitRegistry,
    on_error: Option<ErrorHandler>,
    resolved: bool,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> JsmResult<Self> {
        Ok(Self {
            options,
            extractor: Extractor::new()?,
            parser: DirectiveParser::new()?,
            transform: Box::new(EjsTemplateTransform::new()),
            registry: UnitRegistry::new(),
            on_error: None,
            resolved: false,
        })
    }

    /// Use a different markup compiler for template units
    pub fn with_transform(mut self, transform: Box<dyn TemplateTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    fn report(&self, error: JsmError) -> JsmError {
        if let Some(handler) = &self.on_error {
            handler(&error);
        }
        error
    }

    /// Register one source file.
    ///
    /// Empty files are skipped and a path seen before is ignored; both
    /// return `Ok(false)`. Streamed content is rejected.
    pub fn add_file(&mut self, file: SourceFile) -> JsmResult<bool> {
        if self.registry.contains_path(&file.path) {
            debug!("Skipping duplicate file {}", file.path);
            return Ok(false);
        }

        let text = match file.text() {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(false),
            Err(e) => return Err(self.report(e)),
        };

        let unit = self
            .parse_file(&file, &text)
            .map_err(|e| self.report(e))?;
        Ok(self.registry.register(unit))
    }

    /// Build a unit from file text: split, transform, strip, banner, parse
    fn parse_file(&self, file: &SourceFile, text: &str) -> JsmResult<SourceUnit> {
        let kind = UnitKind::from_path(&file.path);
        let mut unit = SourceUnit::new(&file.path, &file.base, &file.cwd, kind);

        let (mut header, mut body) = match kind {
            UnitKind::Template => {
                let extracted = self.extractor.split_template(text);
                let compiled = self.transform.transform(&extracted.body)?;
                (extracted.header, compiled)
            }
            UnitKind::Script => {
                let extracted = self.extractor.split_script(text);
                if extracted.malformed {
                    warn!("{} has no recognisable module wrapper", file.path);
                }
                (extracted.header, extracted.body)
            }
        };

        if self.options.strip_debug {
            header = self.extractor.strip_debug(&header);
            body = self.extractor.strip_debug(&body);
        }

        let directives = self.parser.parse(&header);
        body = format!("{}{}", banner(BannerKind::File, &file.path), body);
        if kind == UnitKind::Template {
            if let Some(export) = template_export(&directives.provides) {
                body.push_str(&export);
            }
        }

        unit.header = header;
        unit.body = body;
        unit.provides = directives.provides;
        unit.requires = directives.requires;
        unit.overrides = directives.overrides;
        Ok(unit)
    }

    /// Apply a replacement source to the registered units.
    ///
    /// Returns the number of units whose content was replaced.
    pub fn integrate_replacement(&mut self, text: &str, origin: &str) -> usize {
        let integrator =
            ReplacementIntegrator::new(&self.extractor, &self.parser, self.options.strip_debug);
        integrator.integrate(&mut self.registry, text, origin)
    }

    /// Compute reference counts; idempotent within a pass
    pub fn resolve(&mut self) -> JsmResult<()> {
        if self.resolved {
            return Ok(());
        }
        let resolver = DependencyResolver::new(self.options.max_depth);
        if let Err(e) = resolver.resolve(&mut self.registry) {
            return Err(self.report(e));
        }
        self.resolved = true;
        Ok(())
    }

    /// Resolve, prune, order and join into the final artifact
    pub fn compile(mut self) -> JsmResult<CompiledArtifact> {
        self.resolve()?;
        let plan = BuildPlan::from_registry(self.registry);
        let artifact = plan.emit();
        debug!(
            "Compiled {} units ({} pruned, {} bytes)",
            artifact.unit_count,
            plan.pruned().len(),
            artifact.len()
        );
        Ok(artifact)
    }
}
