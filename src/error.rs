//! Tool-level build error.

use std::fmt;

use crate::config::ConfigError;

/// General-purpose error for the builder. The message is the
/// space-joined rendering of the parts it was constructed from.
#[derive(Debug, thiserror::Error)]
#[error("{msg}")]
pub struct BuildError {
    msg: String,
}

impl BuildError {
    /// Join the parts with single spaces into the error message
    pub fn new<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let msg = parts
            .into_iter()
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self { msg }
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        Self {
            msg: err.to_string(),
        }
    }
}
