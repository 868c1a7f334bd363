//! Prompt assembly for structured extraction.

/// System instruction: strict JSON output, no prose, no extra keys.
pub const SYSTEM_PROMPT: &str = "You extract structured data from OCR text and output strict JSON only. \
     Do not include markdown, comments, or extra keys outside the requested schema.";

/// Domain rule block steering field-name synonym mapping and locale-aware
/// normalization. Biased toward invoices, including German-language ones.
pub const INVOICE_EXTRACTION_RULES: &str = "\
Task focus: invoices, including German-language invoices.

Use common German invoice labels and synonyms when mapping fields:
- invoice_number: Rechnungsnummer, Belegnummer, Dokumentnummer
- invoice_date: Rechnungsdatum, Datum
- due_date: Faelligkeitsdatum, zahlbar bis
- total/gross_total: Gesamtbetrag, Bruttobetrag, Rechnungsbetrag
- net_total: Nettobetrag, Zwischensumme
- tax/vat_amount: USt, MwSt, Mehrwertsteuer
- currency: EUR, USD, CHF (or symbols EUR, $, CHF)
- vendor_name: Lieferant, Aussteller, Rechnungsteller
- customer_name: Kunde, Rechnungsempfaenger

Normalization rules:
- Convert German number formats to JSON numbers (e.g. \"1.234,56\" -> 1234.56).
- Prefer ISO dates YYYY-MM-DD when possible (e.g. 31.12.2025 -> 2025-12-31).
- Return null only when value is genuinely missing/unknown.
- Never invent invoice values that are not present in text.";

/// Builds the user prompt: schema property names, the domain rule block, the
/// full schema document, and the extracted text truncated to `max_chars`.
pub fn build_user_prompt(schema: &serde_json::Value, text: &str, max_chars: usize) -> String {
    let schema_keys: Vec<&str> = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|props| props.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let schema_text = serde_json::to_string(schema).unwrap_or_default();

    format!(
        "Extract data from the provided text and fit it to this JSON schema.\n\n\
         Required output keys come from schema properties: {:?}\n\n\
         {}\n\n\
         JSON Schema:\n{}\n\n\
         Text:\n{}",
        schema_keys,
        INVOICE_EXTRACTION_RULES,
        schema_text,
        truncate_chars(text, max_chars),
    )
}

/// Truncates to at most `max_chars` characters, never splitting a UTF-8
/// code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
