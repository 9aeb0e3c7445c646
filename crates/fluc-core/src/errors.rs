//! Error type of the flow engine. Only configuration and I/O edges fail.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error payload: a stable code plus the offending values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable code such as `harmonic-range` or `report_write`.
    pub code: String,
    /// Diagnostic message.
    pub message: String,
    /// Offending settings and their limits.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested remedy, e.g. the default value to fall back to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload without context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records an offending setting or limit.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Attaches a remedy.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the flow engine.
///
/// Data conditions (empty events, tiny subevents) never produce errors; they
/// are absorbed by the reference clipping policy. Errors only surface from
/// configuration validation and from the I/O edges of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FlucError {
    /// Invalid analysis or model configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem and thread-pool errors raised by drivers.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut separator = " (";
        for (key, value) in &self.context {
            write!(f, "{separator}{key}={value}")?;
            separator = ", ";
        }
        if !self.context.is_empty() {
            write!(f, ")")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; {hint}")?;
        }
        Ok(())
    }
}

impl FlucError {
    /// Payload of any variant.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FlucError::Config(info) | FlucError::Serde(info) | FlucError::Io(info) => info,
        }
    }
}
