use jsmodule_core::{JsmError, JsmResult};

/// Turns template markup into a script body.
///
/// The compiler calls this once per template unit, after the header has
/// been split off and before debug stripping and banner insertion. The
/// result must define a function named `anonymous`, which the unit's
/// first provided name is bound to.
pub trait TemplateTransform {
    fn transform(&self, markup: &str) -> JsmResult<String>;
}

const OPEN_TAG: &str = "<%";
const CLOSE_TAG: &str = "%>";

const ESCAPE_FN: &str = r#"escapeFn = escapeFn || function (s) { return String(s).replace(/&/g, "&amp;").replace(/</g, "&lt;").replace(/>/g, "&gt;").replace(/"/g, "&quot;").replace(/'/g, "&#39;"); };"#;

/// Minifies markup and compiles the EJS tag subset into a client function.
///
/// Supported tags: `<%= expr %>` (escaped output), `<%- expr %>` (raw
/// output), `<%# comment %>` and `<% code %>` scriptlets.
#[derive(Debug, Clone, Default)]
pub struct EjsTemplateTransform;

impl EjsTemplateTransform {
    pub fn new() -> Self {
        Self
    }

    /// Drop `<!-- -->` comments, collapse whitespace runs to one space and
    /// remove whitespace between adjacent tags
    pub fn minify(&self, markup: &str) -> String {
        let mut without_comments = String::with_capacity(markup.len());
        let mut rest = markup;
        while let Some(start) = rest.find("<!--") {
            without_comments.push_str(&rest[..start]);
            rest = match rest[start..].find("-->") {
                Some(end) => &rest[start + end + 3..],
                None => "",
            };
        }
        without_comments.push_str(rest);

        let mut minified = String::with_capacity(without_comments.len());
        let mut chars = without_comments.chars().peekable();
        while let Some(ch) = chars.next() {
            if !ch.is_whitespace() {
                minified.push(ch);
                continue;
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            // Whitespace between two markup tags goes; around EJS tags it is output
            let after_tag = minified.ends_with('>') && !minified.ends_with("%>");
            let mut lookahead = chars.clone();
            let before_tag = lookahead.next() == Some('<') && lookahead.next() != Some('%');
            if !(after_tag && before_tag) {
                minified.push(' ');
            }
        }
        minified.trim().to_string()
    }

    /// Compile minified markup into `function anonymous(locals, escapeFn)`
    pub fn compile(&self, markup: &str) -> JsmResult<String> {
        let mut out = String::from("function anonymous(locals, escapeFn) {\n");
        out.push_str(ESCAPE_FN);
        out.push_str("\nvar __output = [];\nwith (locals || {}) {\n");

        let mut rest = markup;
        while let Some(open) = rest.find(OPEN_TAG) {
            push_text(&mut out, &rest[..open]);

            let tag = &rest[open + OPEN_TAG.len()..];
            let close = tag.find(CLOSE_TAG).ok_or_else(|| {
                JsmError::Template(format!(
                    "Unterminated '<%' tag near: {}",
                    tag.chars().take(40).collect::<String>()
                ))
            })?;
            let inner = &tag[..close];

            if let Some(expr) = inner.strip_prefix('=') {
                out.push_str(&format!("__output.push(escapeFn({}));\n", expr.trim()));
            } else if let Some(expr) = inner.strip_prefix('-') {
                out.push_str(&format!("__output.push({});\n", expr.trim()));
            } else if inner.starts_with('#') {
                // template comment
            } else {
                out.push_str(inner.trim());
                out.push('\n');
            }

            rest = &tag[close + CLOSE_TAG.len()..];
        }
        push_text(&mut out, rest);

        out.push_str("}\nreturn __output.join(\"\");\n}\n");
        Ok(out)
    }
}

impl TemplateTransform for EjsTemplateTransform {
    fn transform(&self, markup: &str) -> JsmResult<String> {
        self.compile(&self.minify(markup))
    }
}

fn push_text(out: &mut String, text: &str) {
    if !text.is_empty() {
        out.push_str(&format!("__output.push({});\n", js_string(text)));
    }
}

/// Double-quoted script string literal
fn js_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}
