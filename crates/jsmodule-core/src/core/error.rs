use thiserror::Error;

pub type JsmResult<T> = Result<T, JsmError>;

#[derive(Error, Debug)]
pub enum JsmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Glob error: {0}")]
    Glob(#[from] globset::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Template error: {0}")]
    Template(String),

    /// A `require` directive names a module nobody provides.
    #[error("Module is missing: {name}")]
    MissingModule { name: String },

    /// Propagation from `path` revisited one of its own ancestors or ran
    /// past the configured depth.
    #[error("Possible recursive error: {path}")]
    RecursiveResolution { path: String },

    #[error("Streaming not supported: {path}")]
    StreamingUnsupported { path: String },
}
