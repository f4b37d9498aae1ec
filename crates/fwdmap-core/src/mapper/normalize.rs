//! Field value normalization keyed by field name.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

lazy_static! {
    static ref DATE_YMD: Regex = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
    static ref DATE_MDY_SLASH: Regex = Regex::new(r"(\d{2})/(\d{2})/(\d{4})").unwrap();
    static ref DATE_MDY_DASH: Regex = Regex::new(r"(\d{2})-(\d{2})-(\d{4})").unwrap();
    static ref DATE_DMY_DOT: Regex = Regex::new(r"(\d{2})\.(\d{2})\.(\d{4})").unwrap();
    static ref DATE_DAY_MONTH: Regex = Regex::new(
        r"(?i)(\d{1,2})\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d{4})"
    )
    .unwrap();
    static ref NON_AMOUNT_CHARS: Regex = Regex::new(r"[^\d.,\-]").unwrap();
    static ref WEIGHT_UNITS: Regex = Regex::new(r"(?i)(kg|lb|lbs|kgs|g|gram|grams)\.?").unwrap();
    static ref NUMERIC_RUN: Regex = Regex::new(r"[\d.,]+").unwrap();
}

/// Field-name fragments that select amount normalization.
const AMOUNT_FIELD_HINTS: [&str; 8] =
    ["amount", "charge", "fee", "cost", "total", "price", "duty", "tax"];

/// Normalize an extracted raw value according to its field name.
///
/// Unrecognized or unparseable values pass through unchanged apart from
/// trimming.
pub fn normalize_value(raw: &str, field_name: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }

    let field = field_name.to_lowercase();

    if field.contains("date") {
        if let Some(date) = normalize_date(value) {
            return date;
        }
    }

    if AMOUNT_FIELD_HINTS.iter().any(|hint| field.contains(hint)) {
        if let Some(amount) = normalize_amount(value) {
            return amount;
        }
    }

    if field.contains("weight") {
        if let Some(weight) = normalize_weight(value) {
            return weight;
        }
    }

    value.to_string()
}

/// Normalize a date to zero-padded `YYYY-MM-DD`.
///
/// Tries `YYYY-MM-DD`, `MM/DD/YYYY`, `MM-DD-YYYY`, `DD.MM.YYYY`, then
/// `D Mon YYYY`; the first structural match wins. The numeric forms are
/// calendar-validated, so a pattern that matches structurally but names an
/// impossible date falls through to the next one.
pub fn normalize_date(value: &str) -> Option<String> {
    let numeric_forms: [(&Regex, &str); 4] = [
        (&DATE_YMD, "%Y-%m-%d"),
        (&DATE_MDY_SLASH, "%m/%d/%Y"),
        (&DATE_MDY_DASH, "%m-%d-%Y"),
        (&DATE_DMY_DOT, "%d.%m.%Y"),
    ];

    for (pattern, format) in numeric_forms {
        if let Some(m) = pattern.find(value) {
            if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), format) {
                return Some(date.format("%Y-%m-%d").to_string());
            }
        }
    }

    // "18 Dec 2024" style
    if let Some(caps) = DATE_DAY_MONTH.captures(value) {
        let day = format!("{:0>2}", &caps[1]);
        let month = month_number(&caps[2]);
        let year = &caps[3];
        return Some(format!("{year}-{month}-{day}"));
    }

    None
}

fn month_number(abbrev: &str) -> &'static str {
    match abbrev.to_lowercase().as_str() {
        "jan" => "01",
        "feb" => "02",
        "mar" => "03",
        "apr" => "04",
        "may" => "05",
        "jun" => "06",
        "jul" => "07",
        "aug" => "08",
        "sep" => "09",
        "oct" => "10",
        "nov" => "11",
        "dec" => "12",
        _ => "01",
    }
}

/// Normalize a monetary amount to a plain number with two decimals.
///
/// Currency symbols and spacing are stripped. A comma is read as a decimal
/// separator only when it is the sole separator and is followed by one or
/// two digits; otherwise commas are thousands separators.
pub fn normalize_amount(value: &str) -> Option<String> {
    let cleaned = NON_AMOUNT_CHARS.replace_all(value, "");
    if cleaned.is_empty() {
        return None;
    }

    let has_comma = cleaned.contains(',');
    let has_period = cleaned.contains('.');

    let prepared = if has_comma && has_period {
        cleaned.replace(',', "")
    } else if has_comma {
        let parts: Vec<&str> = cleaned.split(',').collect();
        if parts.len() == 2 && (1..=2).contains(&parts[1].len()) {
            cleaned.replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else {
        cleaned.into_owned()
    };

    Decimal::from_str(&prepared)
        .ok()
        .map(|amount| format!("{amount:.2}"))
}

/// Normalize a weight by stripping unit tokens and amount-normalizing the
/// first numeric run.
pub fn normalize_weight(value: &str) -> Option<String> {
    let stripped = WEIGHT_UNITS.replace_all(value, "");
    let stripped = stripped.trim();

    NUMERIC_RUN
        .find(stripped)
        .and_then(|m| normalize_amount(m.as_str()))
}
