//! Crate-level error types.

use std::fmt;

use crate::animation::EasingError;
use crate::dom::{DomError, SelectorError};

/// Errors produced by the glint crate.
#[derive(Debug)]
pub enum GlintError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A configured selector does not parse.
    Selector {
        /// Which option held it.
        option: &'static str,
        /// The parse failure.
        source: SelectorError,
    },
    /// A configured easing curve does not parse.
    Easing(EasingError),
    /// A configured threshold is outside `[0, 1]`.
    Threshold(f32),
    /// The host document failed during setup.
    Dom(DomError),
}

impl fmt::Display for GlintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Selector { option, source } => {
                write!(f, "invalid selector for '{option}': {source}")
            }
            Self::Easing(e) => write!(f, "invalid easing: {e}"),
            Self::Threshold(t) => {
                write!(f, "threshold {t} is outside [0, 1]")
            }
            Self::Dom(e) => write!(f, "document error: {e}"),
        }
    }
}

impl std::error::Error for GlintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Selector { source, .. } => Some(source),
            Self::Easing(e) => Some(e),
            Self::Dom(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GlintError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<EasingError> for GlintError {
    fn from(e: EasingError) -> Self {
        Self::Easing(e)
    }
}

impl From<DomError> for GlintError {
    fn from(e: DomError) -> Self {
        Self::Dom(e)
    }
}
