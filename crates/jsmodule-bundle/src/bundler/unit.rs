use jsmodule_core::{JsmError, JsmResult};
use serde::Serialize;
use std::fmt;
use std::io::Read;

const BANNER_RULE: &str =
    "**************************************************************************";

/// Extraction strategy for a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Script,
    Template,
}

impl UnitKind {
    /// Templates are recognised by an `.html` fragment anywhere in the path
    pub fn from_path(path: &str) -> Self {
        if path.contains(".html") {
            UnitKind::Template
        } else {
            UnitKind::Script
        }
    }
}

/// Whether a banner introduces an ingested file or an injected replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    File,
    Replacement,
}

/// Comment block prefixed to every emitted body
pub fn banner(kind: BannerKind, path: &str) -> String {
    let label = match kind {
        BannerKind::File => "FILE",
        BannerKind::Replacement => "REPLACEMENT FILE",
    };
    format!(
        "/{rule}\n**** {label}: {path}\n{rule}/\n\n",
        rule = BANNER_RULE,
        label = label,
        path = path
    )
}

fn has_segment(path: &str, segment: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains(&format!("/{}/", segment)) || lower.contains(&format!("\\{}\\", segment))
}

/// Path lies under a shared `common` directory
pub fn is_common_path(path: &str) -> bool {
    has_segment(path, "common")
}

/// Path lies under a `test` directory
pub fn is_test_path(path: &str) -> bool {
    has_segment(path, "test")
}

/// Content handed over by the ingestion side
pub enum FileContents {
    /// No content at all; ignored by the compiler
    Empty,
    Buffered(Vec<u8>),
    /// Not materialised; rejected with `StreamingUnsupported`
    Streamed(Box<dyn Read>),
}

impl fmt::Debug for FileContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileContents::Empty => f.write_str("Empty"),
            FileContents::Buffered(bytes) => write!(f, "Buffered({} bytes)", bytes.len()),
            FileContents::Streamed(_) => f.write_str("Streamed"),
        }
    }
}

/// A raw source file as delivered by the ingestion collaborator
#[derive(Debug)]
pub struct SourceFile {
    pub path: String,
    pub base: String,
    pub cwd: String,
    pub contents: FileContents,
}

impl SourceFile {
    pub fn buffered(
        path: impl Into<String>,
        base: impl Into<String>,
        cwd: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            cwd: cwd.into(),
            contents: FileContents::Buffered(contents.into()),
        }
    }

    /// Decoded text, `None` for empty files
    pub fn text(&self) -> JsmResult<Option<String>> {
        match &self.contents {
            FileContents::Empty => Ok(None),
            FileContents::Buffered(bytes) => Ok(Some(String::from_utf8_lossy(bytes).into_owned())),
            FileContents::Streamed(_) => Err(JsmError::StreamingUnsupported {
                path: self.path.clone(),
            }),
        }
    }
}

/// One registered compilation unit.
///
/// Identity fields never change after construction. Content fields are
/// written only by the registry's replacement path, and `reference_count`
/// only by the resolver.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: String,
    base: String,
    cwd: String,
    kind: UnitKind,
    is_common: bool,
    is_test: bool,
    pub(crate) header: String,
    pub(crate) body: String,
    pub(crate) provides: Vec<String>,
    pub(crate) requires: Vec<String>,
    pub(crate) overrides: Vec<String>,
    pub(crate) reference_count: u64,
}

impl SourceUnit {
    pub fn new(path: &str, base: &str, cwd: &str, kind: UnitKind) -> Self {
        Self {
            path: path.to_string(),
            base: base.to_string(),
            cwd: cwd.to_string(),
            kind,
            is_common: is_common_path(path),
            is_test: is_test_path(path),
            header: String::new(),
            body: String::new(),
            provides: Vec::new(),
            requires: Vec::new(),
            overrides: Vec::new(),
            reference_count: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn is_common(&self) -> bool {
        self.is_common
    }

    pub fn is_test(&self) -> bool {
        self.is_test
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn provides(&self) -> &[String] {
        &self.provides
    }

    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    pub fn overrides(&self) -> &[String] {
        &self.overrides
    }

    pub fn reference_count(&self) -> u64 {
        self.reference_count
    }

    /// Test units are kept even when nothing demands them
    pub fn survives_pruning(&self) -> bool {
        self.reference_count > 0 || self.is_test
    }

    pub fn summary(&self) -> UnitSummary {
        UnitSummary {
            path: self.path.clone(),
            kind: self.kind,
            is_common: self.is_common,
            is_test: self.is_test,
            provides: self.provides.clone(),
            requires: self.requires.clone(),
            overrides: self.overrides.clone(),
            reference_count: self.reference_count,
            pruned: !self.survives_pruning(),
        }
    }
}

/// Serializable view of a unit after resolution
#[derive(Debug, Clone, Serialize)]
pub struct UnitSummary {
    pub path: String,
    pub kind: UnitKind,
    pub is_common: bool,
    pub is_test: bool,
    pub provides: Vec<String>,
    pub requires: Vec<String>,
    pub overrides: Vec<String>,
    pub reference_count: u64,
    pub pruned: bool,
}
