//! Built-in fallback configuration.
//!
//! Used when no pattern/rule source is configured. The pattern set covers
//! the major express and ocean carriers; the rule set covers the standard
//! invoice fields produced by document-intelligence providers.

use crate::models::{ExtractionPattern, ForwarderPattern, MappingRule};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in forwarder identification patterns.
pub fn default_forwarder_patterns() -> Vec<ForwarderPattern> {
    vec![
        ForwarderPattern {
            forwarder_id: "default-dhl".to_string(),
            code: "DHL".to_string(),
            name: "DHL Express".to_string(),
            display_name: "DHL Express".to_string(),
            names: strings(&["DHL", "DHL Express", "DHL Global", "DHL International"]),
            keywords: strings(&["waybill", "awb number", "dhl tracking", "express worldwide"]),
            formats: strings(&[r"\d{10}", r"[A-Z]{3}\d{7}"]),
            logo_text: strings(&["dhl", "simply delivered"]),
            priority: 100,
        },
        ForwarderPattern {
            forwarder_id: "default-fedex".to_string(),
            code: "FDX".to_string(),
            name: "FedEx".to_string(),
            display_name: "FedEx".to_string(),
            names: strings(&["FedEx", "Federal Express", "FedEx Express", "FedEx Ground"]),
            keywords: strings(&[
                "fedex tracking",
                "door tag",
                "express saver",
                "international priority",
            ]),
            formats: strings(&[r"\d{12}", r"\d{15}", r"\d{20,22}"]),
            logo_text: strings(&["fedex", "federal express"]),
            priority: 100,
        },
        ForwarderPattern {
            forwarder_id: "default-ups".to_string(),
            code: "UPS".to_string(),
            name: "UPS".to_string(),
            display_name: "UPS (United Parcel Service)".to_string(),
            names: strings(&["UPS", "United Parcel Service", "UPS Express", "UPS Ground"]),
            keywords: strings(&["ups tracking", "worldship", "ground shipping"]),
            formats: strings(&[r"1Z[A-Z0-9]{16}", r"\d{9}", r"\d{18}"]),
            logo_text: strings(&["ups", "united parcel service"]),
            priority: 100,
        },
        ForwarderPattern {
            forwarder_id: "default-maersk".to_string(),
            code: "MAERSK".to_string(),
            name: "Maersk".to_string(),
            display_name: "Maersk Line".to_string(),
            names: strings(&["Maersk", "Maersk Line", "A.P. Moller-Maersk"]),
            keywords: strings(&[
                "bill of lading",
                "container number",
                "booking number",
                "vessel name",
            ]),
            formats: strings(&[r"MSKU\d{7}", r"MRKU\d{7}"]),
            logo_text: strings(&["maersk", "constant care"]),
            priority: 90,
        },
        ForwarderPattern {
            forwarder_id: "default-msc".to_string(),
            code: "MSC".to_string(),
            name: "MSC".to_string(),
            display_name: "Mediterranean Shipping Company".to_string(),
            names: strings(&["MSC", "Mediterranean Shipping Company"]),
            keywords: strings(&["msc tracking", "bill of lading", "container tracking"]),
            formats: strings(&[r"MSCU\d{7}", r"MEDU\d{7}"]),
            logo_text: strings(&["msc", "mediterranean shipping"]),
            priority: 90,
        },
        ForwarderPattern {
            forwarder_id: "default-sf".to_string(),
            code: "SF".to_string(),
            name: "SF Express".to_string(),
            display_name: "SF Express".to_string(),
            names: strings(&["SF Express", "S.F. Express"]),
            keywords: strings(&["sf tracking", "express delivery", "waybill number"]),
            formats: strings(&[r"SF\d{12}"]),
            logo_text: strings(&["sf express", "sf"]),
            priority: 80,
        },
    ]
}

fn azure_rule(id: &str, field: &str, label: &str, azure_name: &str) -> MappingRule {
    MappingRule {
        id: id.to_string(),
        field_name: field.to_string(),
        field_label: label.to_string(),
        extraction_pattern: ExtractionPattern::AzureField {
            azure_field_name: azure_name.to_string(),
            fallback_pattern: None,
            confidence_boost: None,
        },
        priority: 100,
        is_required: false,
        validation_pattern: None,
        default_value: None,
        category: Some("universal".to_string()),
    }
}

/// Built-in tier-1 mapping rules for the standard invoice fields.
///
/// One structured-field rule per field, with regex or keyword fallbacks for
/// the fields that commonly survive plain OCR.
pub fn default_mapping_rules() -> Vec<MappingRule> {
    let mut rules = vec![
        azure_rule("uni-invoice-id", "invoiceId", "Invoice ID", "InvoiceId"),
        azure_rule("uni-invoice-date", "invoiceDate", "Invoice Date", "InvoiceDate"),
        azure_rule("uni-due-date", "dueDate", "Due Date", "DueDate"),
        azure_rule("uni-vendor-name", "vendorName", "Vendor Name", "VendorName"),
        azure_rule("uni-customer-name", "customerName", "Customer Name", "CustomerName"),
        azure_rule("uni-sub-total", "subTotal", "Subtotal", "SubTotal"),
        azure_rule("uni-total-tax", "totalTax", "Total Tax", "TotalTax"),
        azure_rule("uni-invoice-total", "invoiceTotal", "Invoice Total", "InvoiceTotal"),
        azure_rule("uni-amount-due", "amountDue", "Amount Due", "AmountDue"),
        azure_rule("uni-currency", "currency", "Currency", "CurrencyCode"),
    ];

    rules.push(MappingRule {
        id: "uni-invoice-id-rx".to_string(),
        field_name: "invoiceId".to_string(),
        field_label: "Invoice ID".to_string(),
        extraction_pattern: ExtractionPattern::Regex {
            pattern: r"(?:invoice\s*(?:no|number|id)\.?|inv\.?\s*no\.?)[:\s]+([A-Za-z0-9/_-]+)"
                .to_string(),
            flags: Some("i".to_string()),
            group_index: Some(1),
            confidence_boost: None,
        },
        priority: 50,
        is_required: false,
        validation_pattern: None,
        default_value: None,
        category: Some("universal".to_string()),
    });

    rules.push(MappingRule {
        id: "uni-invoice-date-kw".to_string(),
        field_name: "invoiceDate".to_string(),
        field_label: "Invoice Date".to_string(),
        extraction_pattern: ExtractionPattern::Keyword {
            keywords: strings(&["invoice date", "date of issue", "issued on"]),
            proximity_words: None,
            max_distance: None,
            confidence_boost: None,
        },
        priority: 50,
        is_required: false,
        validation_pattern: Some(r"\d{4}-\d{2}-\d{2}".to_string()),
        default_value: None,
        category: Some("universal".to_string()),
    });

    rules.push(MappingRule {
        id: "uni-invoice-total-kw".to_string(),
        field_name: "invoiceTotal".to_string(),
        field_label: "Invoice Total".to_string(),
        extraction_pattern: ExtractionPattern::Keyword {
            keywords: strings(&["total amount", "invoice total", "total due", "grand total"]),
            proximity_words: None,
            max_distance: None,
            confidence_boost: None,
        },
        priority: 50,
        is_required: false,
        validation_pattern: Some(r"-?\d+\.\d{2}".to_string()),
        default_value: None,
        category: Some("universal".to_string()),
    });

    rules
}
