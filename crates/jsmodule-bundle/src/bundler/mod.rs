pub mod core;
pub mod extractor;
pub mod integrator;
pub mod parser;
pub mod planner;
pub mod registry;
pub mod resolver;
pub mod template;
pub mod unit;

pub use self::core::{CompileOptions, Compiler, ErrorHandler};
