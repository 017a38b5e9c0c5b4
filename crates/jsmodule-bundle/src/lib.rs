//! Module-aware source concatenation.
//!
//! Source units declare the modules they provide and require through
//! header directives (`ns.provide('a.b');`, `ns.require('c');`). The
//! [`Compiler`] registers units, applies replacement sources, weighs every
//! unit by how strongly it is required, drops unreferenced units and joins
//! the rest, most depended-upon first, into one artifact.

pub mod bundler;

pub use bundler::extractor::{Boundary, Extracted, Extractor};
pub use bundler::parser::{DirectiveKind, DirectiveParser, Directives};
pub use bundler::planner::{BuildPlan, CompiledArtifact};
pub use bundler::registry::{UnitId, UnitRegistry};
pub use bundler::resolver::{DependencyResolver, DEFAULT_MAX_DEPTH};
pub use bundler::template::{EjsTemplateTransform, TemplateTransform};
pub use bundler::unit::{FileContents, SourceFile, SourceUnit, UnitKind, UnitSummary};
pub use bundler::{CompileOptions, Compiler, ErrorHandler};
