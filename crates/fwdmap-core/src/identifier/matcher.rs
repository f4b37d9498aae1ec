//! Pattern-based forwarder identification.

use regex::RegexBuilder;
use tracing::{info, warn};

use crate::models::{
    ForwarderPattern, IdentificationResult, MatchDetail, MatchMethod, UnidentifiedReason,
};

/// Catch-all pattern code, never scored.
const UNKNOWN_CODE: &str = "UNKNOWN";

/// Scores candidate forwarder patterns against OCR text.
///
/// Holds an immutable, priority-ordered pattern set; `identify` is a pure
/// function of the text and that set, so one matcher can serve concurrent
/// calls.
pub struct ForwarderMatcher {
    patterns: Vec<ForwarderPattern>,
}

impl ForwarderMatcher {
    /// Score for the first matching name variant.
    pub const SCORE_NAME_MATCH: f64 = 40.0;
    /// Score per matching keyword.
    pub const SCORE_KEYWORD_MATCH: f64 = 15.0;
    /// Ceiling on the cumulative keyword contribution per pattern.
    pub const SCORE_KEYWORD_MAX: f64 = 30.0;
    /// Score for the first matching tracking-number format.
    pub const SCORE_FORMAT_MATCH: f64 = 20.0;
    /// Score for the first matching logo phrase.
    pub const SCORE_LOGO_TEXT_MATCH: f64 = 10.0;
    /// Flat score for each additional name variant beyond the first.
    pub const SCORE_BONUS_PER_MATCH: f64 = 5.0;

    /// Confidence at or above which a document is auto-identified.
    pub const THRESHOLD_AUTO_IDENTIFY: f64 = 80.0;
    /// Confidence at or above which a result is surfaced for review.
    pub const THRESHOLD_NEEDS_REVIEW: f64 = 50.0;

    /// Create a matcher over the given pattern set.
    ///
    /// Patterns are evaluated in descending priority; the sort is stable so
    /// equal priorities keep their input order.
    pub fn new(mut patterns: Vec<ForwarderPattern>) -> Self {
        patterns.sort_by_key(|p| std::cmp::Reverse(p.priority));
        info!("matcher initialized with {} patterns", patterns.len());
        Self { patterns }
    }

    /// The configured patterns in evaluation order.
    pub fn patterns(&self) -> &[ForwarderPattern] {
        &self.patterns
    }

    /// Identify the forwarder that issued the given OCR text.
    pub fn identify(&self, text: &str) -> IdentificationResult {
        if text.trim().is_empty() {
            return IdentificationResult::unidentified(UnidentifiedReason::EmptyText);
        }

        let normalized = normalize_text(text);

        let mut best: Option<IdentificationResult> = None;
        let mut best_confidence = 0.0;

        for pattern in &self.patterns {
            if pattern.code == UNKNOWN_CODE {
                continue;
            }

            let result = self.match_pattern(pattern, &normalized, text);

            // Strict comparison: the first candidate to reach a score wins ties.
            if result.confidence > best_confidence {
                best_confidence = result.confidence;
                best = Some(result);
            }
        }

        match best {
            Some(result) if best_confidence >= Self::THRESHOLD_NEEDS_REVIEW => {
                info!(
                    forwarder_code = result.forwarder_code.as_deref().unwrap_or(""),
                    confidence = result.confidence,
                    "identification completed"
                );
                result
            }
            _ => IdentificationResult::unidentified(UnidentifiedReason::NoMatch),
        }
    }

    /// Score a single pattern against the text.
    ///
    /// Format regexes run against the original text; everything else runs
    /// against the normalized text.
    fn match_pattern(
        &self,
        pattern: &ForwarderPattern,
        normalized: &str,
        original: &str,
    ) -> IdentificationResult {
        let mut total = 0.0;
        let mut matched_patterns = Vec::new();
        let mut details = Vec::new();
        let mut method = MatchMethod::None;

        // 1. Name match: full score once, flat bonus per extra variant
        let mut name_matched = false;
        for name in &pattern.names {
            if normalized.contains(&name.to_lowercase()) {
                let score = if name_matched {
                    Self::SCORE_BONUS_PER_MATCH
                } else {
                    method = MatchMethod::Name;
                    name_matched = true;
                    Self::SCORE_NAME_MATCH
                };
                total += score;
                matched_patterns.push(format!("name:{name}"));
                details.push(MatchDetail {
                    match_type: MatchMethod::Name,
                    pattern: name.clone(),
                    matched_text: None,
                    score,
                });
            }
        }

        // 2. Keyword match, cumulative contribution capped
        let mut keyword_score = 0.0;
        for keyword in &pattern.keywords {
            if normalized.contains(&keyword.to_lowercase()) {
                let score = (Self::SCORE_KEYWORD_MAX - keyword_score)
                    .min(Self::SCORE_KEYWORD_MATCH)
                    .max(0.0);
                if score > 0.0 {
                    keyword_score += score;
                    total += score;
                    if method == MatchMethod::None {
                        method = MatchMethod::Keyword;
                    }
                }
                matched_patterns.push(format!("keyword:{keyword}"));
                details.push(MatchDetail {
                    match_type: MatchMethod::Keyword,
                    pattern: keyword.clone(),
                    matched_text: None,
                    score,
                });
            }
        }

        // 3. Format match: first matching regex only
        for format in &pattern.formats {
            match RegexBuilder::new(format).case_insensitive(true).build() {
                Ok(re) => {
                    if let Some(m) = re.find(original) {
                        total += Self::SCORE_FORMAT_MATCH;
                        if method == MatchMethod::None {
                            method = MatchMethod::Format;
                        }
                        matched_patterns.push(format!("format:{format}"));
                        details.push(MatchDetail {
                            match_type: MatchMethod::Format,
                            pattern: format.clone(),
                            matched_text: Some(m.as_str().to_string()),
                            score: Self::SCORE_FORMAT_MATCH,
                        });
                        break;
                    }
                }
                Err(e) => {
                    warn!(
                        pattern = %format,
                        forwarder_code = %pattern.code,
                        "invalid format regex: {e}"
                    );
                }
            }
        }

        // 4. Logo text match: first matching phrase only
        for logo in &pattern.logo_text {
            if normalized.contains(&logo.to_lowercase()) {
                total += Self::SCORE_LOGO_TEXT_MATCH;
                if method == MatchMethod::None {
                    method = MatchMethod::LogoText;
                }
                matched_patterns.push(format!("logo:{logo}"));
                details.push(MatchDetail {
                    match_type: MatchMethod::LogoText,
                    pattern: logo.clone(),
                    matched_text: None,
                    score: Self::SCORE_LOGO_TEXT_MATCH,
                });
                break;
            }
        }

        let confidence = total.min(100.0);

        IdentificationResult {
            forwarder_id: Some(pattern.forwarder_id.clone()),
            forwarder_code: Some(pattern.code.clone()),
            forwarder_name: Some(pattern.display_name.clone()),
            confidence,
            match_method: method,
            matched_patterns,
            match_details: details,
            is_identified: confidence >= Self::THRESHOLD_AUTO_IDENTIFY,
            reason: None,
        }
    }
}

/// Lowercase, collapse whitespace runs to single spaces, trim.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::defaults::default_forwarder_patterns;

    fn pattern(code: &str, priority: i32) -> ForwarderPattern {
        ForwarderPattern {
            forwarder_id: format!("test-{}", code.to_lowercase()),
            code: code.to_string(),
            name: code.to_string(),
            display_name: code.to_string(),
            names: Vec::new(),
            keywords: Vec::new(),
            formats: Vec::new(),
            logo_text: Vec::new(),
            priority,
        }
    }

    #[test]
    fn test_empty_text_short_circuits() {
        let matcher = ForwarderMatcher::new(default_forwarder_patterns());

        for text in ["", "   ", "\n\t  \n"] {
            let result = matcher.identify(text);
            assert_eq!(result.reason, Some(UnidentifiedReason::EmptyText));
            assert_eq!(result.confidence, 0.0);
            assert!(!result.is_identified);
        }
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  DHL   Express\n\tInvoice "), "dhl express invoice");
    }

    #[test]
    fn test_dhl_scenario_with_default_patterns() {
        let matcher = ForwarderMatcher::new(default_forwarder_patterns());
        let text = "DHL\nAir waybill\nShipment number: 1234567890";

        let result = matcher.identify(text);

        assert_eq!(result.forwarder_code.as_deref(), Some("DHL"));
        assert_eq!(result.match_method, MatchMethod::Name);
        assert!(result.confidence >= 80.0, "confidence was {}", result.confidence);
        assert!(result.is_identified);
        assert_eq!(result.reason, None);
    }

    #[test]
    fn test_confidence_always_bounded() {
        let mut p = pattern("ACME", 100);
        p.names = (0..20).map(|i| format!("variant{i}")).collect();
        p.keywords = vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()];
        p.formats = vec![r"\d{4}".to_string()];
        p.logo_text = vec!["variant0".to_string()];

        let text = (0..20).map(|i| format!("variant{i}")).collect::<Vec<_>>().join(" ")
            + " alpha beta gamma 9999";

        let matcher = ForwarderMatcher::new(vec![p]);
        let result = matcher.identify(&text);

        // 40 + 19*5 names alone would exceed the cap
        assert_eq!(result.confidence, 100.0);
        assert!(result.is_identified);
    }

    #[test]
    fn test_name_bonus_dominates_keyword_cap() {
        let mut by_name = pattern("NAMED", 100);
        by_name.names = vec!["acme logistics".to_string()];
        by_name.formats = vec![r"\d{6}".to_string()];

        let mut by_keywords = pattern("KEYED", 100);
        by_keywords.keywords = (0..5).map(|i| format!("kw{i}")).collect();
        by_keywords.formats = vec![r"\d{6}".to_string()];

        let matcher = ForwarderMatcher::new(vec![by_keywords, by_name]);
        let result = matcher.identify("acme logistics kw0 kw1 kw2 kw3 kw4 ref 123456");

        // keyword contribution caps at 30, strictly below the 40 name score,
        // so 60 beats 50 even with five keyword hits
        assert_eq!(result.forwarder_code.as_deref(), Some("NAMED"));
        assert_eq!(result.confidence, 60.0);
    }

    #[test]
    fn test_keyword_contribution_capped() {
        let mut p = pattern("KEYED", 100);
        p.keywords = (0..4).map(|i| format!("kw{i}")).collect();
        // name keeps the result above the review threshold
        p.names = vec!["keyed".to_string()];

        let matcher = ForwarderMatcher::new(vec![p]);
        let result = matcher.identify("keyed kw0 kw1 kw2 kw3");

        assert_eq!(result.confidence, 70.0); // 40 name + 30 capped keywords

        let keyword_scores: Vec<f64> = result
            .match_details
            .iter()
            .filter(|d| d.match_type == MatchMethod::Keyword)
            .map(|d| d.score)
            .collect();
        assert_eq!(keyword_scores, vec![15.0, 15.0, 0.0, 0.0]);
    }

    #[test]
    fn test_format_awarded_once() {
        let mut p = pattern("FMT", 100);
        p.names = vec!["fmt".to_string()];
        p.formats = vec![r"\d{4}".to_string(), r"[A-Z]{2}\d{2}".to_string()];

        let matcher = ForwarderMatcher::new(vec![p]);
        let result = matcher.identify("fmt 1234 AB12");

        assert_eq!(result.confidence, 60.0); // 40 + one format bonus
        let format_details: Vec<_> = result
            .match_details
            .iter()
            .filter(|d| d.match_type == MatchMethod::Format)
            .collect();
        assert_eq!(format_details.len(), 1);
        assert_eq!(format_details[0].matched_text.as_deref(), Some("1234"));
    }

    #[test]
    fn test_logo_text_awarded_once() {
        let mut p = pattern("LOGO", 100);
        p.names = vec!["logo co".to_string()];
        p.logo_text = vec!["swoosh".to_string(), "delivered".to_string()];

        let matcher = ForwarderMatcher::new(vec![p]);
        let result = matcher.identify("logo co swoosh delivered");

        assert_eq!(result.confidence, 50.0); // 40 + one logo bonus
    }

    #[test]
    fn test_match_method_reflects_first_scoring_stage() {
        let mut p = pattern("KW", 100);
        p.keywords = vec!["bill of lading".to_string(), "container number".to_string()];
        p.formats = vec![r"XYZU\d{7}".to_string()];
        p.logo_text = vec!["kw lines".to_string()];

        let matcher = ForwarderMatcher::new(vec![p]);
        let result =
            matcher.identify("bill of lading container number XYZU1234567 kw lines");

        assert_eq!(result.match_method, MatchMethod::Keyword);
        assert_eq!(result.confidence, 60.0); // 30 keywords + 20 format + 10 logo
        // between the thresholds: surfaced for review, not auto-identified
        assert!(!result.is_identified);
        assert_eq!(result.status(), crate::models::IdentificationStatus::NeedsReview);
    }

    #[test]
    fn test_tie_keeps_first_evaluated() {
        let mut first = pattern("FIRST", 50);
        first.names = vec!["shared name".to_string()];
        first.formats = vec![r"\d{10}".to_string()];
        let mut second = pattern("SECOND", 50);
        second.names = vec!["shared name".to_string()];
        second.formats = vec![r"\d{10}".to_string()];

        let matcher = ForwarderMatcher::new(vec![first, second]);
        let result = matcher.identify("shared name tracking 1234567890");

        assert_eq!(result.forwarder_code.as_deref(), Some("FIRST"));
    }

    #[test]
    fn test_priority_orders_evaluation() {
        let mut low = pattern("LOW", 10);
        low.names = vec!["shared name".to_string()];
        low.formats = vec![r"\d{5}".to_string()];
        let mut high = pattern("HIGH", 90);
        high.names = vec!["shared name".to_string()];
        high.formats = vec![r"\d{5}".to_string()];

        // input order has LOW first, but HIGH is evaluated first
        let matcher = ForwarderMatcher::new(vec![low, high]);
        let result = matcher.identify("shared name something 55555");

        assert_eq!(result.forwarder_code.as_deref(), Some("HIGH"));
    }

    #[test]
    fn test_unknown_sentinel_skipped() {
        let mut catch_all = pattern("UNKNOWN", 100);
        catch_all.names = vec!["invoice".to_string()];

        let matcher = ForwarderMatcher::new(vec![catch_all]);
        let result = matcher.identify("invoice from somewhere");

        assert_eq!(result.reason, Some(UnidentifiedReason::NoMatch));
        assert_eq!(result.forwarder_code, None);
    }

    #[test]
    fn test_invalid_format_regex_does_not_abort() {
        let mut p = pattern("BROKEN", 100);
        p.names = vec!["broken".to_string()];
        p.formats = vec!["[unclosed".to_string(), r"\d{6}".to_string()];

        let matcher = ForwarderMatcher::new(vec![p]);
        let result = matcher.identify("broken 123456");

        // the malformed format is skipped, the next one still scores
        assert_eq!(result.confidence, 60.0);
    }

    #[test]
    fn test_below_review_threshold_is_no_match() {
        let mut p = pattern("WEAK", 100);
        p.keywords = vec!["waybill".to_string()];

        let matcher = ForwarderMatcher::new(vec![p]);
        let result = matcher.identify("waybill attached");

        assert_eq!(result.reason, Some(UnidentifiedReason::NoMatch));
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.match_method, MatchMethod::None);
    }

    #[test]
    fn test_format_matches_original_text_casing() {
        let mut p = pattern("CASE", 100);
        p.names = vec!["case lines".to_string()];
        p.formats = vec![r"msku\d{7}".to_string()];

        let matcher = ForwarderMatcher::new(vec![p]);
        // format regexes are applied case-insensitively to the original text
        let result = matcher.identify("CASE LINES container MSKU1234567");

        assert_eq!(result.confidence, 60.0);
    }

    #[test]
    fn test_identify_is_deterministic() {
        let matcher = ForwarderMatcher::new(default_forwarder_patterns());
        let text = "FedEx International Priority\nTracking: 123456789012";

        let first = matcher.identify(text);
        let second = matcher.identify(text);

        assert_eq!(first, second);
    }
}
