//! Errors raised by the dispatch simulator before any step runs.

use std::error::Error;
use std::fmt;

/// Rejection of a simulation input.
///
/// Every variant carries the dotted field path that failed and a
/// human-readable constraint description, mirroring [`crate::config::ConfigError`].
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Structurally invalid input: unknown enum value, zero steps, or a
    /// series whose length disagrees with `step_count`.
    Configuration { field: String, message: String },
    /// A magnitude outside its physical domain (negative capacity,
    /// efficiency outside `[0, 1]`, non-finite demand).
    NumericDomain { field: String, message: String },
}

impl SimError {
    pub(crate) fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn numeric(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NumericDomain {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Dotted path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::Configuration { field, .. } | Self::NumericDomain { field, .. } => field,
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { field, message } => {
                write!(f, "configuration error: {field}: {message}")
            }
            Self::NumericDomain { field, message } => {
                write!(f, "numeric domain error: {field}: {message}")
            }
        }
    }
}

impl Error for SimError {}
