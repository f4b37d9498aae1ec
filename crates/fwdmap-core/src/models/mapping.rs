//! Field mapping result models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rule::{ConfidenceSource, ExtractionMethod};

/// Axis-aligned bounding box in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where on the document a value was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPosition {
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Output for one resolved field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMappingResult {
    /// Normalized value.
    pub value: String,
    /// Value as extracted, before normalization.
    pub raw_value: String,
    /// Bounded [0, 100].
    pub confidence: f64,
    pub source: ConfidenceSource,
    pub rule_id: String,
    pub extraction_method: ExtractionMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<FieldPosition>,
    pub is_validated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

/// Diagnostics for a field no rule could resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmappedFieldDetail {
    pub reason: String,
    /// Methods of the rules that were attempted, in evaluation order.
    pub attempts: Vec<ExtractionMethod>,
}

/// Aggregate statistics over one mapping run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStatistics {
    /// Distinct field names with at least one rule.
    pub total_fields: usize,
    pub mapped_fields: usize,
    pub unmapped_fields: usize,
    /// Mean confidence over mapped fields only, rounded to 2 decimals.
    pub average_confidence: f64,
    pub processing_time_ms: u64,
    /// Successful single-rule resolutions (one per mapped field).
    pub rules_applied: usize,
}

/// Full result of one mapping run.
///
/// Maps are ordered so repeated runs over identical input serialize
/// identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingOutcome {
    pub field_mappings: BTreeMap<String, FieldMappingResult>,
    pub unmapped_fields: BTreeMap<String, UnmappedFieldDetail>,
    pub statistics: ExtractionStatistics,
}
