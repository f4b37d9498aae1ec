//! Error types for the fwdmap-core library.
//!
//! Malformed input (OCR text, field bags, regex sources inside rules) never
//! raises: the matcher and mapper degrade to "no match" and log. Typed
//! errors are reserved for contract violations at the rule-intake boundary.

use thiserror::Error;

/// Main error type for the fwdmap library.
#[derive(Error, Debug)]
pub enum FwdmapError {
    /// Rule or pattern intake error.
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while loading mapping rules.
///
/// `UnsupportedMethod` means the extraction pattern names a method outside
/// the closed set; `Inconsistent` means a known method with a shape that
/// violates the contract. Both are detected from the rule data itself,
/// never recovered from another error's message text.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The extraction-pattern tag names a method this engine does not support.
    #[error("unsupported extraction method: {0}")]
    UnsupportedMethod(String),

    /// The rule names a supported method but its shape is invalid.
    #[error("inconsistent rule definition: {0}")]
    Inconsistent(String),
}

/// Result type for the fwdmap library.
pub type Result<T> = std::result::Result<T, FwdmapError>;
