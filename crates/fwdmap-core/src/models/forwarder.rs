//! Forwarder identification data models.

use serde::{Deserialize, Serialize};

use crate::identifier::ForwarderMatcher;

/// Recognition rules for one candidate forwarder.
///
/// Loaded once per configuration epoch and treated as immutable. `priority`
/// only orders candidate evaluation; it never contributes to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwarderPattern {
    pub forwarder_id: String,
    /// Short code, e.g. "DHL". The code "UNKNOWN" is a catch-all sentinel
    /// that is skipped during scoring.
    pub code: String,
    pub name: String,
    pub display_name: String,
    /// Company name variants matched as substrings of normalized text.
    #[serde(default)]
    pub names: Vec<String>,
    /// Distinctive keywords or phrases.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Tracking-number formats as regular expressions, matched against the
    /// original (un-normalized) text.
    #[serde(default)]
    pub formats: Vec<String>,
    /// Text found near the carrier logo.
    #[serde(default)]
    pub logo_text: Vec<String>,
    #[serde(default)]
    pub priority: i32,
}

impl ForwarderPattern {
    /// Parse a JSON array of forwarder patterns.
    pub fn parse_many(json: &str) -> crate::error::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The scoring stage a match contribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Name,
    Keyword,
    Format,
    LogoText,
    None,
}

/// One atomic contribution to a candidate's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    #[serde(rename = "type")]
    pub match_type: MatchMethod,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
    pub score: f64,
}

/// Why an identification call produced no winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnidentifiedReason {
    /// Input text was empty or whitespace-only; no pattern was evaluated.
    EmptyText,
    /// No candidate cleared the review threshold.
    NoMatch,
}

/// Output of one identification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    pub forwarder_id: Option<String>,
    pub forwarder_code: Option<String>,
    pub forwarder_name: Option<String>,
    /// Bounded [0, 100]; a heuristic score, not a calibrated probability.
    pub confidence: f64,
    /// The first scoring stage that contributed any score.
    pub match_method: MatchMethod,
    pub matched_patterns: Vec<String>,
    pub match_details: Vec<MatchDetail>,
    pub is_identified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnidentifiedReason>,
}

impl IdentificationResult {
    /// Build an unidentified result carrying a machine-readable reason.
    pub fn unidentified(reason: UnidentifiedReason) -> Self {
        Self {
            forwarder_id: None,
            forwarder_code: None,
            forwarder_name: None,
            confidence: 0.0,
            match_method: MatchMethod::None,
            matched_patterns: Vec::new(),
            match_details: Vec::new(),
            is_identified: false,
            reason: Some(reason),
        }
    }

    /// Tri-state routing status for this result.
    pub fn status(&self) -> IdentificationStatus {
        IdentificationStatus::from_confidence(self.confidence)
    }
}

/// Caller-facing routing status derived from confidence thresholds.
///
/// The derivation belongs to the calling layer; the matcher's threshold
/// constants are the single source of truth for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentificationStatus {
    Identified,
    NeedsReview,
    Unidentified,
}

impl IdentificationStatus {
    /// Map a confidence score to its routing status.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= ForwarderMatcher::THRESHOLD_AUTO_IDENTIFY {
            Self::Identified
        } else if confidence >= ForwarderMatcher::THRESHOLD_NEEDS_REVIEW {
            Self::NeedsReview
        } else {
            Self::Unidentified
        }
    }
}

impl std::fmt::Display for IdentificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Identified => "IDENTIFIED",
            Self::NeedsReview => "NEEDS_REVIEW",
            Self::Unidentified => "UNIDENTIFIED",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds_are_disjoint() {
        assert_eq!(IdentificationStatus::from_confidence(100.0), IdentificationStatus::Identified);
        assert_eq!(IdentificationStatus::from_confidence(80.0), IdentificationStatus::Identified);
        assert_eq!(IdentificationStatus::from_confidence(79.9), IdentificationStatus::NeedsReview);
        assert_eq!(IdentificationStatus::from_confidence(50.0), IdentificationStatus::NeedsReview);
        assert_eq!(IdentificationStatus::from_confidence(49.9), IdentificationStatus::Unidentified);
        assert_eq!(IdentificationStatus::from_confidence(0.0), IdentificationStatus::Unidentified);
    }

    #[test]
    fn test_pattern_parses_camel_case_json() {
        let json = r#"[{
            "forwarderId": "default-dhl",
            "code": "DHL",
            "name": "DHL Express",
            "displayName": "DHL Express",
            "names": ["DHL"],
            "keywords": ["waybill"],
            "formats": ["\\d{10}"],
            "logoText": ["dhl"],
            "priority": 100
        }]"#;

        let patterns = ForwarderPattern::parse_many(json).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].code, "DHL");
        assert_eq!(patterns[0].logo_text, vec!["dhl".to_string()]);
    }

    #[test]
    fn test_unidentified_result_shape() {
        let result = IdentificationResult::unidentified(UnidentifiedReason::EmptyText);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.is_identified);
        assert_eq!(result.match_method, MatchMethod::None);
        assert_eq!(result.reason, Some(UnidentifiedReason::EmptyText));

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""reason":"empty_text""#));
        assert!(json.contains(r#""matchMethod":"none""#));
    }
}
