use jsmodule_core::{JsmError, JsmResult};
use regex::Regex;

/// The three header directives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Provide,
    Require,
    Override,
}

impl DirectiveKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DirectiveKind::Provide => "provide",
            DirectiveKind::Require => "require",
            DirectiveKind::Override => "override",
        }
    }

    /// `ns.<keyword>('dotted.Name');`, keyword matched case-insensitively
    fn pattern(self) -> String {
        format!(
            r#"(?i)[0-9a-zA-Z_]+\.{}\(\w*["']([a-z0-9A-Z_.]*)["']\w*\)\w*;"#,
            self.keyword()
        )
    }
}

/// Names declared in a unit header, each list in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub provides: Vec<String>,
    pub requires: Vec<String>,
    pub overrides: Vec<String>,
}

/// Scans unit headers for provide/require/override calls
pub struct DirectiveParser {
    provide: Regex,
    require: Regex,
    override_: Regex,
}

impl DirectiveParser {
    pub fn new() -> JsmResult<Self> {
        let compile = |kind: DirectiveKind| {
            Regex::new(&kind.pattern())
                .map_err(|e| JsmError::Config(format!("Invalid regex: {}", e)))
        };
        Ok(Self {
            provide: compile(DirectiveKind::Provide)?,
            require: compile(DirectiveKind::Require)?,
            override_: compile(DirectiveKind::Override)?,
        })
    }

    /// Parse all three directive lists from a header.
    ///
    /// Each kind gets its own pass, so the relative order of provides and
    /// requires in the source does not matter. Repeated directives are kept.
    pub fn parse(&self, header: &str) -> Directives {
        Directives {
            provides: self.extract(DirectiveKind::Provide, header),
            requires: self.extract(DirectiveKind::Require, header),
            overrides: self.extract(DirectiveKind::Override, header),
        }
    }

    /// Names of a single directive kind
    pub fn extract(&self, kind: DirectiveKind, header: &str) -> Vec<String> {
        let re = match kind {
            DirectiveKind::Provide => &self.provide,
            DirectiveKind::Require => &self.require,
            DirectiveKind::Override => &self.override_,
        };
        re.captures_iter(header)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

/// Statement binding a compiled template to the first name it provides
pub fn template_export(provides: &[String]) -> Option<String> {
    provides
        .first()
        .map(|name| format!("{} = anonymous;", name))
}
