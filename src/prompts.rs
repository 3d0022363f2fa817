//! The extraction instruction sent ahead of the document parts.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the requested fields or the
//!    missing-field sentinel requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled instruction
//!    without a live model call, so field-list regressions are cheap to catch.
//!
//! The field list and the sentinel are deliberately data, not prose baked
//! into one string: deployments differ in which fields they care about and
//! some downstreams key on a different sentinel. Callers override both via
//! [`crate::config::ExtractionConfig`]; the constants here are the defaults.

/// Fields requested from the model when the caller does not override them.
///
/// Covers the usual cross-section of a commercial invoice, packing list, and
/// bill of lading for a single ocean shipment.
pub const DEFAULT_FIELDS: &[&str] = &[
    "Invoice Number",
    "Invoice Date",
    "Seller / Exporter",
    "Buyer / Importer",
    "Total Invoice Value",
    "Currency",
    "Incoterms",
    "Country of Origin",
    "Port of Loading",
    "Port of Discharge",
    "Vessel / Voyage",
    "Bill of Lading Number",
    "Container Number(s)",
    "Number of Packages",
    "Gross Weight",
    "Net Weight",
    "Description of Goods",
    "HS Code(s)",
];

/// Sentinel reported for any requested field absent from the documents.
pub const DEFAULT_SENTINEL: &str = "Not Found";

/// Assemble the instruction text that precedes the document parts.
///
/// The instruction enumerates every requested field and states the sentinel
/// policy explicitly, so a field missing from the documents comes back as
/// the sentinel string rather than being silently omitted.
pub fn build_instruction(fields: &[String], sentinel: &str) -> String {
    let mut lines = String::with_capacity(512);
    lines.push_str(
        "You are a trade documentation analyst. The attached files are shipping \
         documents for a single consignment, in this order when present: \
         commercial invoice, packing list, bill of lading.\n\n\
         Extract the following fields and report each on its own line as \
         'Field: value':\n\n",
    );
    for field in fields {
        lines.push_str("- ");
        lines.push_str(field);
        lines.push('\n');
    }
    lines.push_str(&format!(
        "\nIf a field cannot be found in any of the documents, write exactly \
         \"{sentinel}\" as its value. Do not omit any field, do not guess, and \
         do not add commentary beyond the field lines."
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_fields() -> Vec<String> {
        DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn instruction_lists_every_field() {
        let text = build_instruction(&default_fields(), DEFAULT_SENTINEL);
        for field in DEFAULT_FIELDS {
            assert!(text.contains(field), "missing field: {field}");
        }
    }

    #[test]
    fn instruction_states_sentinel_policy() {
        let text = build_instruction(&default_fields(), DEFAULT_SENTINEL);
        assert!(text.contains("\"Not Found\""));
    }

    #[test]
    fn custom_sentinel_is_honoured() {
        let fields = vec!["Invoice Number".to_string()];
        let text = build_instruction(&fields, "N/A");
        assert!(text.contains("\"N/A\""));
        assert!(!text.contains("Not Found"));
    }
}
