pub mod error;
pub mod error_help;
pub mod path;

pub use error::{JsmError, JsmResult};
pub use error_help::{format_error_with_help, ErrorHelp};
