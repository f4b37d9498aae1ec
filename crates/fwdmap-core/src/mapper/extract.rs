//! Per-method field extraction.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::warn;

use crate::models::{ConfidenceSource, FieldMappingResult, MappingRule};

use super::FieldMapper;

lazy_static! {
    // Leading run of a line, up to a newline or pipe, at most 100 chars
    static ref LINE_VALUE: Regex = Regex::new(r"^([^\n\r|]{1,100})").unwrap();
    static ref TRAILING_PUNCT: Regex = Regex::new(r"[,;:\s]+$").unwrap();
}

impl FieldMapper {
    /// Look up a field in the structured OCR output.
    pub(super) fn extract_azure_field(
        &self,
        rule: &MappingRule,
        azure_field_name: &str,
        boost: f64,
        structured_fields: Option<&Value>,
    ) -> Option<FieldMappingResult> {
        let bag = structured_fields?;
        let raw = lookup_structured_value(bag, azure_field_name)?;

        Some(self.build_result(
            rule,
            raw,
            Self::BASE_CONFIDENCE_AZURE,
            boost,
            ConfidenceSource::Azure,
        ))
    }

    /// Extract via a regular expression over the full OCR text.
    pub(super) fn extract_regex(
        &self,
        rule: &MappingRule,
        pattern: &str,
        flags: Option<&str>,
        group_index: Option<usize>,
        boost: f64,
        ocr_text: &str,
        forwarder_id: Option<&str>,
    ) -> Option<FieldMappingResult> {
        let flags = flags.unwrap_or("");
        let re = match RegexBuilder::new(pattern)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                warn!(pattern = %pattern, rule_id = %rule.id, "invalid extraction regex: {e}");
                return None;
            }
        };

        let caps = re.captures(ocr_text)?;
        let group = group_index.unwrap_or(0);
        // An out-of-range group index falls back to the whole match; a valid
        // group that did not participate yields no result.
        let matched = if group < re.captures_len() {
            caps.get(group)?
        } else {
            caps.get(0)?
        };

        let raw = matched.as_str();
        if raw.is_empty() {
            return None;
        }

        Some(self.build_result(
            rule,
            raw.to_string(),
            Self::BASE_CONFIDENCE_REGEX,
            boost,
            determine_source(forwarder_id),
        ))
    }

    /// Extract the value following the first occurrence of any keyword.
    pub(super) fn extract_keyword(
        &self,
        rule: &MappingRule,
        keywords: &[String],
        max_distance: usize,
        boost: f64,
        ocr_text: &str,
        forwarder_id: Option<&str>,
    ) -> Option<FieldMappingResult> {
        for keyword in keywords {
            let Ok(re) = RegexBuilder::new(&regex::escape(keyword))
                .case_insensitive(true)
                .build()
            else {
                continue;
            };
            let Some(m) = re.find(ocr_text) else {
                continue;
            };

            // Bounded context window after the keyword, in characters
            let context: String = ocr_text[m.end()..].chars().take(max_distance).collect();

            if let Some(raw) = value_after_keyword(&context) {
                return Some(self.build_result(
                    rule,
                    raw,
                    Self::BASE_CONFIDENCE_KEYWORD,
                    boost,
                    determine_source(forwarder_id),
                ));
            }
        }

        None
    }
}

/// Tier provenance for non-azure extractions.
///
/// Rules are assumed to be pre-filtered by the caller: with a forwarder id
/// the run carries forwarder-specific rules (tier2), otherwise universal
/// ones (tier1).
pub(super) fn determine_source(forwarder_id: Option<&str>) -> ConfidenceSource {
    if forwarder_id.is_some() {
        ConfidenceSource::Tier2
    } else {
        ConfidenceSource::Tier1
    }
}

/// Find a field in the structured bag by exact, then case-insensitive name.
///
/// The bag may nest its entries under a `fields` key. Entries may be
/// `{value|content}`-shaped records or plain scalars.
fn lookup_structured_value(bag: &Value, field_name: &str) -> Option<String> {
    let fields = bag.get("fields").unwrap_or(bag).as_object()?;

    if let Some(entry) = fields.get(field_name) {
        return entry_value(entry);
    }

    let wanted = field_name.to_lowercase();
    fields
        .iter()
        .find(|(key, _)| key.to_lowercase() == wanted)
        .and_then(|(_, entry)| entry_value(entry))
}

fn entry_value(entry: &Value) -> Option<String> {
    match entry {
        Value::Object(record) => {
            match record.get("value").and_then(scalar_text) {
                Some(v) if !v.is_empty() => Some(v),
                _ => record.get("content").and_then(scalar_text),
            }
        }
        scalar => scalar_text(scalar),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Pull a field value out of the context following a keyword.
fn value_after_keyword(context: &str) -> Option<String> {
    let context = context.trim_start_matches([' ', ':', '：', '\t', '\n']);
    if context.is_empty() {
        return None;
    }

    let caps = LINE_VALUE.captures(context)?;
    let value = TRAILING_PUNCT.replace(caps[1].trim(), "");
    if value.is_empty() {
        None
    } else {
        Some(value.into_owned())
    }
}
