//! Core library for forwarder identification and invoice field mapping.
//!
//! This crate provides:
//! - Pattern-based forwarder identification with confidence scoring
//! - Prioritized multi-method field extraction (structured fields, regex,
//!   keyword proximity)
//! - Value normalization (dates, amounts, weights) and rule validation
//! - Built-in fallback patterns and universal mapping rules
//!
//! Both engines are pure: configuration is loaded once by the caller and
//! passed in, every call is a function of its inputs, and all I/O lives
//! outside this crate.

pub mod defaults;
pub mod error;
pub mod identifier;
pub mod mapper;
pub mod models;

pub use error::{FwdmapError, Result, RuleError};
pub use identifier::ForwarderMatcher;
pub use mapper::FieldMapper;
pub use models::{
    ExtractionStatistics, FieldMappingResult, ForwarderPattern, IdentificationResult,
    IdentificationStatus, MappingOutcome, MappingRule, UnmappedFieldDetail,
};
