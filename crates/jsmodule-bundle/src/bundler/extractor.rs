use jsmodule_core::{JsmError, JsmResult};
use regex::Regex;

/// Opening of an immediately-invoked wrapper: `(function name(a, b) {`
const WRAPPER_OPEN: &str = r"\(\w*function[^(]*\([a-zA-Z0-9., _]*\)[^{]*\{";
/// Closing invocation: `})(window.app);`
const WRAPPER_CLOSE: &str = r"\}\)\([a-zA-Z0-9_.$]*\);";
const DEBUG_START: &str = r"(?i)\* pragma:DEBUG_START";
const DEBUG_END: &str = r"(?i)pragma:DEBUG_END";
const COMMENT_CLOSE: &str = "*/";
const MARKUP_COMMENT_CLOSE: &str = "-->";

/// A scanned position, either matched in the text or a named fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Found(usize),
    /// Pattern absent; start of text for openings, end of text for closings
    Fallback(usize),
}

impl Boundary {
    pub fn position(self) -> usize {
        match self {
            Boundary::Found(pos) | Boundary::Fallback(pos) => pos,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Boundary::Found(_))
    }
}

/// Header/body split of a unit's raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub header: String,
    pub body: String,
    /// The script wrapper was not found at one or both ends
    pub malformed: bool,
}

/// Splits unit text into the directive header and the wrapped body
pub struct Extractor {
    wrapper_open: Regex,
    wrapper_close: Regex,
    debug_start: Regex,
    debug_end: Regex,
}

fn compile(pattern: &str) -> JsmResult<Regex> {
    Regex::new(pattern).map_err(|e| JsmError::Config(format!("Invalid regex: {}", e)))
}

impl Extractor {
    pub fn new() -> JsmResult<Self> {
        Ok(Self {
            wrapper_open: compile(WRAPPER_OPEN)?,
            wrapper_close: compile(WRAPPER_CLOSE)?,
            debug_start: compile(DEBUG_START)?,
            debug_end: compile(DEBUG_END)?,
        })
    }

    /// Where the module wrapper opens; `Fallback(0)` when there is none
    pub fn header_end(&self, text: &str) -> Boundary {
        match self.wrapper_open.find(text) {
            Some(m) => Boundary::Found(m.start()),
            None => Boundary::Fallback(0),
        }
    }

    /// First byte after the wrapper's opening brace.
    ///
    /// Without a brace at or after `from` the body starts at `from`.
    pub fn body_start(&self, text: &str, from: usize) -> usize {
        text[from..]
            .find('{')
            .map(|offset| from + offset + 1)
            .unwrap_or(from)
    }

    /// Start of the last wrapper close in `body`; `Fallback(len)` when there is none
    pub fn footer_start(&self, body: &str) -> Boundary {
        match self.wrapper_close.find_iter(body).last() {
            Some(m) => Boundary::Found(m.start()),
            None => Boundary::Fallback(body.len()),
        }
    }

    /// Split a script unit around its immediately-invoked wrapper
    pub fn split_script(&self, text: &str) -> Extracted {
        let header_end = self.header_end(text);
        let start = self.body_start(text, header_end.position());
        let rest = &text[start..];
        let footer = self.footer_start(rest);

        Extracted {
            header: text[..header_end.position()].to_string(),
            body: rest[..footer.position()].to_string(),
            malformed: !header_end.is_found() || !footer.is_found(),
        }
    }

    /// Split a template unit after its leading markup comment.
    ///
    /// The header runs through the first `-->`; the single character that
    /// follows it is dropped. A template without a leading comment is all body.
    pub fn split_template(&self, text: &str) -> Extracted {
        match text.find(MARKUP_COMMENT_CLOSE) {
            Some(pos) if pos > 0 => {
                let header_end = pos + MARKUP_COMMENT_CLOSE.len();
                let mut tail = text[header_end..].chars();
                tail.next();
                Extracted {
                    header: text[..header_end].to_string(),
                    body: tail.as_str().to_string(),
                    malformed: false,
                }
            }
            _ => Extracted {
                header: String::new(),
                body: text.to_string(),
                malformed: false,
            },
        }
    }

    /// Remove every `/* pragma:DEBUG_START ... pragma:DEBUG_END */` span.
    ///
    /// Each span runs from the comment opener before the start marker
    /// through the first `*/` after the end marker. A span that is never
    /// closed extends to the end of the text.
    pub fn strip_debug(&self, text: &str) -> String {
        let mut kept = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = self.debug_start.find(rest) {
            let opener = rest[..start.start()]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            kept.push_str(&rest[..opener]);

            let span = &rest[start.start()..];
            rest = match self.debug_end.find(span) {
                Some(end) => {
                    let after_end = &span[end.end()..];
                    match after_end.find(COMMENT_CLOSE) {
                        Some(close) => &after_end[close + COMMENT_CLOSE.len()..],
                        None => "",
                    }
                }
                None => "",
            };
        }

        kept.push_str(rest);
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new().unwrap()
    }

    const CART: &str = "app.provide('app.Cart');\napp.require('app.Store');\n\n(function (app, jq) {\n  var items = [];\n})(window.app);\n";

    #[test]
    fn test_split_script_wrapper() {
        let extracted = extractor().split_script(CART);
        assert_eq!(
            extracted.header,
            "app.provide('app.Cart');\napp.require('app.Store');\n\n"
        );
        assert_eq!(extracted.body, "\n  var items = [];\n");
        assert!(!extracted.malformed);
    }

    #[test]
    fn test_named_wrapper_function() {
        let text = "x.provide('a');\n(function module(w) {\nbody();\n})(w);";
        let extracted = extractor().split_script(text);
        assert_eq!(extracted.header, "x.provide('a');\n");
        assert_eq!(extracted.body, "\nbody();\n");
    }

    #[test]
    fn test_footer_uses_last_close() {
        let text = "(function () {\n(function () {})(inner);\nouter();\n})(outer);";
        let extracted = extractor().split_script(text);
        assert_eq!(extracted.body, "\n(function () {})(inner);\nouter();\n");
    }

    #[test]
    fn test_missing_wrapper_falls_back() {
        let e = extractor();
        let text = "var loose = 1;";
        assert_eq!(e.header_end(text), Boundary::Fallback(0));
        assert_eq!(e.footer_start(text), Boundary::Fallback(text.len()));

        let extracted = e.split_script(text);
        assert_eq!(extracted.header, "");
        assert_eq!(extracted.body, "var loose = 1;");
        assert!(extracted.malformed);
    }

    #[test]
    fn test_missing_footer_keeps_rest_of_text() {
        let extracted = extractor().split_script("a.provide('a');\n(function () {\nrun();\n");
        assert_eq!(extracted.body, "\nrun();\n");
        assert!(extracted.malformed);
    }

    #[test]
    fn test_split_template() {
        let text = "<!-- app.provide('tpl.Cart'); -->\n<div class=\"cart\"></div>";
        let extracted = extractor().split_template(text);
        assert_eq!(extracted.header, "<!-- app.provide('tpl.Cart'); -->");
        assert_eq!(extracted.body, "<div class=\"cart\"></div>");
    }

    #[test]
    fn test_split_template_without_comment() {
        let extracted = extractor().split_template("<p>hi</p>");
        assert_eq!(extracted.header, "");
        assert_eq!(extracted.body, "<p>hi</p>");
    }

    #[test]
    fn test_strip_debug_span() {
        let text = "var a;\n/* pragma:DEBUG_START */ log(); /* pragma:DEBUG_END */X";
        assert_eq!(extractor().strip_debug(text), "var a;\nX");
    }

    #[test]
    fn test_strip_debug_is_case_insensitive_and_repeats() {
        let text = "a/* Pragma:debug_start */1/* PRAGMA:DEBUG_END */b/* pragma:DEBUG_START */2/* pragma:DEBUG_END */c";
        assert_eq!(extractor().strip_debug(text), "abc");
    }

    #[test]
    fn test_strip_debug_unclosed_span() {
        let text = "keep/* pragma:DEBUG_START */ never closed";
        assert_eq!(extractor().strip_debug(text), "keep");
    }

    #[test]
    fn test_strip_debug_without_markers() {
        let text = "// pragma once\nvar b;";
        assert_eq!(extractor().strip_debug(text), text);
    }
}
