//! Mapping rule models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, RuleError};

/// Extraction method identifier, as recorded on results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Regex,
    Keyword,
    Position,
    AzureField,
}

/// Provenance bucket for a resolved field.
///
/// `Tier3` is reserved for a learned classification tier and is never
/// produced by this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceSource {
    Tier1,
    Tier2,
    Tier3,
    Azure,
}

/// Page-relative region for position-based extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRegion {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Closed set of extraction instructions, tagged by `method`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ExtractionPattern {
    #[serde(rename_all = "camelCase")]
    Regex {
        pattern: String,
        /// Flag characters: `i` (case-insensitive), `m` (multi-line),
        /// `s` (dot matches newline).
        #[serde(default)]
        flags: Option<String>,
        #[serde(default)]
        group_index: Option<usize>,
        #[serde(default)]
        confidence_boost: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Keyword {
        keywords: Vec<String>,
        #[serde(default)]
        proximity_words: Option<Vec<String>>,
        /// Context window after the keyword, in characters.
        #[serde(default)]
        max_distance: Option<usize>,
        #[serde(default)]
        confidence_boost: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Position {
        #[serde(default)]
        page: Option<u32>,
        region: PositionRegion,
        #[serde(default)]
        confidence_boost: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    AzureField {
        azure_field_name: String,
        #[serde(default)]
        fallback_pattern: Option<String>,
        #[serde(default)]
        confidence_boost: Option<f64>,
    },
}

impl ExtractionPattern {
    /// Method tags accepted at rule intake.
    pub const SUPPORTED_METHODS: [&'static str; 4] =
        ["regex", "keyword", "position", "azure_field"];

    /// The method this pattern dispatches to.
    pub fn method(&self) -> ExtractionMethod {
        match self {
            Self::Regex { .. } => ExtractionMethod::Regex,
            Self::Keyword { .. } => ExtractionMethod::Keyword,
            Self::Position { .. } => ExtractionMethod::Position,
            Self::AzureField { .. } => ExtractionMethod::AzureField,
        }
    }

    /// Declared confidence boost, zero when absent.
    pub fn confidence_boost(&self) -> f64 {
        match self {
            Self::Regex { confidence_boost, .. }
            | Self::Keyword { confidence_boost, .. }
            | Self::Position { confidence_boost, .. }
            | Self::AzureField { confidence_boost, .. } => confidence_boost.unwrap_or(0.0),
        }
    }
}

/// One extraction instruction for one target field.
///
/// Multiple rules may target the same `field_name` as fallbacks; they are
/// tried in descending `priority` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
    pub id: String,
    pub field_name: String,
    pub field_label: String,
    pub extraction_pattern: ExtractionPattern,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub is_required: bool,
    /// Prefix-anchored regular expression the normalized value must match.
    #[serde(default)]
    pub validation_pattern: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl MappingRule {
    /// Parse a JSON array of mapping rules, classifying contract violations.
    ///
    /// The method tag is inspected structurally before strict decoding, so
    /// an unsupported method is reported as such rather than as a generic
    /// deserialization failure.
    pub fn parse_many(json: &str) -> Result<Vec<Self>> {
        let raw: Vec<Value> = serde_json::from_str(json)?;
        raw.into_iter().map(Self::from_value).collect()
    }

    /// Decode a single rule from a JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let method = value
            .get("extractionPattern")
            .and_then(|p| p.get("method"))
            .and_then(Value::as_str);

        match method {
            Some(m) if ExtractionPattern::SUPPORTED_METHODS.contains(&m) => {
                serde_json::from_value(value)
                    .map_err(|e| RuleError::Inconsistent(e.to_string()).into())
            }
            Some(m) => Err(RuleError::UnsupportedMethod(m.to_string()).into()),
            None => Err(RuleError::Inconsistent(
                "extraction pattern has no method tag".to_string(),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FwdmapError;

    fn rule_json(method_block: &str) -> String {
        format!(
            r#"[{{
                "id": "rule-1",
                "fieldName": "invoiceId",
                "fieldLabel": "Invoice ID",
                "extractionPattern": {method_block},
                "priority": 10
            }}]"#
        )
    }

    #[test]
    fn test_parse_regex_rule() {
        let json = rule_json(
            r#"{"method": "regex", "pattern": "InvoiceId[:\\s]+(\\S+)", "groupIndex": 1, "confidenceBoost": 5}"#,
        );
        let rules = MappingRule::parse_many(&json).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].extraction_pattern.method(), ExtractionMethod::Regex);
        assert_eq!(rules[0].extraction_pattern.confidence_boost(), 5.0);
    }

    #[test]
    fn test_parse_azure_field_rule() {
        let json = rule_json(r#"{"method": "azure_field", "azureFieldName": "InvoiceId"}"#);
        let rules = MappingRule::parse_many(&json).unwrap();
        assert_eq!(rules[0].extraction_pattern.method(), ExtractionMethod::AzureField);
        assert_eq!(rules[0].extraction_pattern.confidence_boost(), 0.0);
    }

    #[test]
    fn test_unsupported_method_is_typed_error() {
        let json = rule_json(r#"{"method": "llm", "prompt": "classify"}"#);
        match MappingRule::parse_many(&json) {
            Err(FwdmapError::Rule(RuleError::UnsupportedMethod(m))) => assert_eq!(m, "llm"),
            other => panic!("expected UnsupportedMethod, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_method_is_inconsistent() {
        let json = rule_json(r#"{"pattern": "x"}"#);
        assert!(matches!(
            MappingRule::parse_many(&json),
            Err(FwdmapError::Rule(RuleError::Inconsistent(_)))
        ));
    }

    #[test]
    fn test_known_method_bad_shape_is_inconsistent() {
        // azure_field without its required field name
        let json = rule_json(r#"{"method": "azure_field"}"#);
        assert!(matches!(
            MappingRule::parse_many(&json),
            Err(FwdmapError::Rule(RuleError::Inconsistent(_)))
        ));
    }

    #[test]
    fn test_pattern_round_trip() {
        let pattern = ExtractionPattern::Keyword {
            keywords: vec!["total".to_string()],
            proximity_words: None,
            max_distance: Some(30),
            confidence_boost: Some(2.5),
        };
        let json = serde_json::to_string(&pattern).unwrap();
        assert!(json.contains(r#""method":"keyword""#));
        assert!(json.contains(r#""maxDistance":30"#));

        let back: ExtractionPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pattern);
    }
}
