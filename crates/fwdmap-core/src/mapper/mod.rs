//! Field mapping module.
//!
//! Resolves named fields from OCR text and an optional structured field bag
//! using prioritized extraction rules.

mod extract;
mod normalize;
mod validate;

pub use normalize::{normalize_amount, normalize_date, normalize_value, normalize_weight};
pub use validate::validate_value;

use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info};

use crate::models::{
    ExtractionPattern, ExtractionStatistics, FieldMappingResult, MappingOutcome, MappingRule,
    UnmappedFieldDetail,
};

/// Default context window for keyword extraction, in characters.
pub const DEFAULT_KEYWORD_DISTANCE: usize = 50;

/// Resolves field values from OCR text and structured OCR output.
///
/// Stateless: every call is a pure function of its inputs, so a single
/// mapper can serve concurrent calls.
pub struct FieldMapper;

impl FieldMapper {
    /// Base confidence for structured-field lookups.
    pub const BASE_CONFIDENCE_AZURE: f64 = 90.0;
    /// Base confidence for regex extraction.
    pub const BASE_CONFIDENCE_REGEX: f64 = 85.0;
    /// Base confidence for keyword-proximity extraction.
    pub const BASE_CONFIDENCE_KEYWORD: f64 = 75.0;
    /// Base confidence for position extraction (not produced yet).
    pub const BASE_CONFIDENCE_POSITION: f64 = 70.0;

    pub fn new() -> Self {
        Self
    }

    /// Resolve every field named by the rule set.
    ///
    /// Rules are grouped by field name; each group is tried in descending
    /// priority order and the first rule yielding a non-empty normalized
    /// value wins. Fields no rule resolves are reported with diagnostics.
    pub fn map_fields(
        &self,
        ocr_text: &str,
        rules: &[MappingRule],
        structured_fields: Option<&Value>,
        forwarder_id: Option<&str>,
    ) -> MappingOutcome {
        let start = Instant::now();

        // Group by field name, preserving first-appearance order
        let mut groups: Vec<(&str, Vec<&MappingRule>)> = Vec::new();
        for rule in rules {
            match groups.iter_mut().find(|(name, _)| *name == rule.field_name) {
                Some((_, group)) => group.push(rule),
                None => groups.push((rule.field_name.as_str(), vec![rule])),
            }
        }

        let mut field_mappings = BTreeMap::new();
        let mut unmapped_fields = BTreeMap::new();
        let mut rules_applied = 0;

        for (field_name, mut group) in groups {
            // Stable sort: equal priorities keep rule input order
            group.sort_by_key(|r| std::cmp::Reverse(r.priority));

            match self.extract_field(&group, ocr_text, structured_fields, forwarder_id) {
                Some(result) => {
                    rules_applied += 1;
                    field_mappings.insert(field_name.to_string(), result);
                }
                None => {
                    unmapped_fields.insert(
                        field_name.to_string(),
                        UnmappedFieldDetail {
                            reason: "no_matching_rule".to_string(),
                            attempts: group
                                .iter()
                                .map(|r| r.extraction_pattern.method())
                                .collect(),
                        },
                    );
                }
            }
        }

        let total_fields = field_mappings.len() + unmapped_fields.len();
        let statistics = build_statistics(
            &field_mappings,
            total_fields,
            rules_applied,
            start.elapsed().as_millis() as u64,
        );

        info!(
            mapped = statistics.mapped_fields,
            unmapped = statistics.unmapped_fields,
            "field mapping completed"
        );

        MappingOutcome {
            field_mappings,
            unmapped_fields,
            statistics,
        }
    }

    /// Resolve one field: first rule with a non-empty normalized value wins.
    fn extract_field(
        &self,
        rules: &[&MappingRule],
        ocr_text: &str,
        structured_fields: Option<&Value>,
        forwarder_id: Option<&str>,
    ) -> Option<FieldMappingResult> {
        for rule in rules {
            let result = match &rule.extraction_pattern {
                ExtractionPattern::AzureField {
                    azure_field_name,
                    confidence_boost,
                    ..
                } => self.extract_azure_field(
                    rule,
                    azure_field_name,
                    confidence_boost.unwrap_or(0.0),
                    structured_fields,
                ),
                ExtractionPattern::Regex {
                    pattern,
                    flags,
                    group_index,
                    confidence_boost,
                } => self.extract_regex(
                    rule,
                    pattern,
                    flags.as_deref(),
                    *group_index,
                    confidence_boost.unwrap_or(0.0),
                    ocr_text,
                    forwarder_id,
                ),
                ExtractionPattern::Keyword {
                    keywords,
                    max_distance,
                    confidence_boost,
                    ..
                } => self.extract_keyword(
                    rule,
                    keywords,
                    max_distance.unwrap_or(DEFAULT_KEYWORD_DISTANCE),
                    confidence_boost.unwrap_or(0.0),
                    ocr_text,
                    forwarder_id,
                ),
                ExtractionPattern::Position { .. } => {
                    // Needs page geometry this engine does not model
                    debug!(field = %rule.field_name, "position extraction not implemented");
                    None
                }
            };

            if let Some(result) = result {
                if !result.value.is_empty() {
                    return Some(result);
                }
            }
        }

        None
    }

    /// Normalize, validate and package a raw extraction.
    fn build_result(
        &self,
        rule: &MappingRule,
        raw_value: String,
        base_confidence: f64,
        boost: f64,
        source: crate::models::ConfidenceSource,
    ) -> FieldMappingResult {
        let confidence = (base_confidence + boost).clamp(0.0, 100.0);
        let value = normalize_value(&raw_value, &rule.field_name);
        let (is_validated, validation_error) =
            validate_value(&value, rule.validation_pattern.as_deref());

        FieldMappingResult {
            value,
            raw_value,
            confidence,
            source,
            rule_id: rule.id.clone(),
            extraction_method: rule.extraction_pattern.method(),
            position: None,
            is_validated,
            validation_error,
        }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn build_statistics(
    mappings: &BTreeMap<String, FieldMappingResult>,
    total_fields: usize,
    rules_applied: usize,
    processing_time_ms: u64,
) -> ExtractionStatistics {
    let mapped_fields = mappings.len();

    let average_confidence = if mapped_fields > 0 {
        let sum: f64 = mappings.values().map(|r| r.confidence).sum();
        (sum / mapped_fields as f64 * 100.0).round() / 100.0
    } else {
        0.0
    };

    ExtractionStatistics {
        total_fields,
        mapped_fields,
        unmapped_fields: total_fields - mapped_fields,
        average_confidence,
        processing_time_ms,
        rules_applied,
    }
}
