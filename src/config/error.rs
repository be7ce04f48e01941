//! Error types for configuration loading and resolution.

use std::io;

/// Errors from configuration parsing, lookup, interpolation, and merging.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unknown section '{0}'")]
    UnknownSection(String),

    #[error("Unknown option '{option}' in section '{section}'")]
    UnknownOption { section: String, option: String },

    #[error("Circular reference while resolving option '{option}' in section '{section}'")]
    CircularReference { section: String, option: String },

    #[error("Bad interpolation reference in option '{option}' in section '{section}': {message}")]
    InterpolationSyntax {
        section: String,
        option: String,
        message: String,
    },

    #[error("Option '{option}' in section '{section}' is not a boolean: '{value}'")]
    InvalidBoolean {
        section: String,
        option: String,
        value: String,
    },

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),
}
