//! Data models for identification and field mapping.

pub mod forwarder;
pub mod mapping;
pub mod rule;

pub use forwarder::{
    ForwarderPattern, IdentificationResult, IdentificationStatus, MatchDetail, MatchMethod,
    UnidentifiedReason,
};
pub use mapping::{
    BoundingBox, ExtractionStatistics, FieldMappingResult, FieldPosition, MappingOutcome,
    UnmappedFieldDetail,
};
pub use rule::{
    ConfidenceSource, ExtractionMethod, ExtractionPattern, MappingRule, PositionRegion,
};
