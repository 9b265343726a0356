//! Structured error types shared across study crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`StudyError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (block names, paths, entries, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for study definition, execution and analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum StudyError {
    /// Malformed or ambiguous configuration entries.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// Lookup of a plugin name that was never registered.
    #[error("unknown plugin: {0}")]
    UnknownPlugin(ErrorInfo),
    /// A block's declared upstream names are not available.
    #[error("requirement error: {0}")]
    Requirement(ErrorInfo),
    /// A plugin name was registered twice within one family.
    #[error("duplicate registration: {0}")]
    DuplicateName(ErrorInfo),
    /// Failures reported by the external simulation engine.
    #[error("engine error: {0}")]
    Engine(ErrorInfo),
    /// Filesystem failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Document encoding and decoding failures.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl StudyError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            StudyError::Config(info)
            | StudyError::UnknownPlugin(info)
            | StudyError::Requirement(info)
            | StudyError::DuplicateName(info)
            | StudyError::Engine(info)
            | StudyError::Io(info)
            | StudyError::Serde(info) => info,
        }
    }

    /// Wraps a filesystem failure, recording the offending path.
    pub fn io(code: &str, path: &Path, err: impl ToString) -> Self {
        StudyError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }

    /// Wraps an encoding or decoding failure.
    pub fn serde(code: &str, err: impl ToString) -> Self {
        StudyError::Serde(ErrorInfo::new(code, err.to_string()))
    }
}
