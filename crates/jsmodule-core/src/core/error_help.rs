use crate::core::JsmError;

/// Provides helpful suggestions for common errors
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for JsmError {
    fn help(&self) -> Option<String> {
        match self {
            JsmError::MissingModule { name } => Some(format!(
                "💡 Suggestion: Add a source that declares provide('{}'), or check that its file matches one of the bundle's source globs",
                name
            )),
            JsmError::RecursiveResolution { .. } => Some(
                "💡 Suggestion: Review the require() directives of this module and remove circular references"
                    .to_string(),
            ),
            JsmError::StreamingUnsupported { .. } => Some(
                "💡 Suggestion: Buffer the file contents before handing them to the compiler"
                    .to_string(),
            ),
            JsmError::Manifest(msg) => {
                if msg.contains("jsmodule.yaml not found") {
                    Some(
                        "💡 Suggestion: Run 'jsmodule init' to create a new project, or navigate to a directory with jsmodule.yaml"
                            .to_string(),
                    )
                } else if msg.contains("No bundle") {
                    Some(
                        "💡 Suggestion: Check the output path against the 'bundles' list in jsmodule.yaml"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            JsmError::Path(msg) => {
                if msg.contains("Could not find jsmodule.yaml") {
                    Some(
                        "💡 Suggestion: Run 'jsmodule init' to create a new project, or navigate to a directory with jsmodule.yaml"
                            .to_string(),
                    )
                } else if msg.contains("Could not determine") {
                    Some(
                        "💡 Suggestion: Check your system environment variables (HOME, APPDATA, etc.)"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            JsmError::Yaml(e) => {
                Some(format!(
                    "💡 Suggestion: Check your YAML syntax. Common issues:\n  - Missing colons after keys\n  - Incorrect indentation\n  - Unclosed quotes\n  - Invalid characters\n\nError details: {}",
                    e
                ))
            }
            JsmError::Glob(_) => Some(
                "💡 Suggestion: Check the 'sources' patterns in jsmodule.yaml (e.g. 'src/**/*.js')"
                    .to_string(),
            ),
            JsmError::Io(e) => {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    Some(
                        "💡 Suggestion: Check file permissions, or try running with appropriate permissions"
                            .to_string(),
                    )
                } else if e.kind() == std::io::ErrorKind::NotFound {
                    Some(
                        "💡 Suggestion: The file or directory may not exist. Check the path and try again"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Format an error with helpful suggestions
pub fn format_error_with_help(error: &JsmError) -> String {
    let mut output = format!("❌ Error: {}", error);

    if let Some(help) = error.help() {
        output.push_str("\n\n");
        output.push_str(&help);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_help_missing_module() {
        let error = JsmError::MissingModule {
            name: "app.core".to_string(),
        };
        assert!(error.help().unwrap().contains("provide('app.core')"));
    }

    #[test]
    fn test_error_help_manifest_not_found() {
        let error = JsmError::Manifest("jsmodule.yaml not found in /path".to_string());
        assert!(error.help().unwrap().contains("jsmodule init"));
    }

    #[test]
    fn test_format_error_without_help() {
        let error = JsmError::Template("unterminated tag".to_string());
        assert_eq!(
            format_error_with_help(&error),
            "❌ Error: Template error: unterminated tag"
        );
    }
}
