//! Wire types for the `generateContent` exchange, and request assembly.
//!
//! The request body is one content block whose parts are the instruction
//! text followed by each encoded document. Part order is a contract: the
//! instruction comes first, then documents in slot order (invoice, packing
//! list, bill of lading), with unpopulated slots simply absent — the
//! instruction tells the model to read the attachments in that order.

use crate::config::ExtractionConfig;
use crate::pipeline::encode::EncodedPart;
use serde::{Deserialize, Serialize};

// ── Request ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

impl GenerateRequest {
    /// Parts in the request body (instruction + documents).
    pub fn part_count(&self) -> usize {
        self.contents.iter().map(|c| c.parts.len()).sum()
    }
}

/// Assemble the single outbound request.
///
/// `parts` must already be in slot order; assembly preserves it and prepends
/// the instruction.
pub fn assemble(
    instruction: &str,
    parts: Vec<EncodedPart>,
    config: &ExtractionConfig,
) -> GenerateRequest {
    let mut body_parts = Vec::with_capacity(parts.len() + 1);
    body_parts.push(Part::Text {
        text: instruction.to_string(),
    });
    body_parts.extend(parts.into_iter().map(|p| Part::InlineData {
        inline_data: InlineData {
            mime_type: p.mime_type,
            data: p.data,
        },
    }));

    GenerateRequest {
        contents: vec![Content { parts: body_parts }],
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        },
    }
}

// ── Response ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

impl GenerateResponse {
    /// The first candidate's text parts, concatenated.
    ///
    /// Returns `None` when there is no candidate, no part, or only empty
    /// text — callers treat all of those as an empty response.
    pub fn text(&self) -> Option<String> {
        let parts = self
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(mime: &str, data: &str) -> EncodedPart {
        EncodedPart {
            mime_type: mime.into(),
            data: data.into(),
        }
    }

    #[test]
    fn instruction_is_first_and_part_order_is_preserved() {
        let config = ExtractionConfig::default();
        let request = assemble(
            "extract the fields",
            vec![part("application/pdf", "AAAA"), part("image/png", "BBBB")],
            &config,
        );

        assert_eq!(request.part_count(), 3);
        let parts = &request.contents[0].parts;
        assert!(matches!(&parts[0], Part::Text { text } if text == "extract the fields"));
        assert!(
            matches!(&parts[1], Part::InlineData { inline_data } if inline_data.data == "AAAA")
        );
        assert!(
            matches!(&parts[2], Part::InlineData { inline_data } if inline_data.data == "BBBB")
        );
    }

    #[test]
    fn request_serialises_with_api_field_names() {
        let config = ExtractionConfig::default();
        let request = assemble("hello", vec![part("application/pdf", "Zm9v")], &config);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "application/pdf"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["data"], "Zm9v");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn response_text_concatenates_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Invoice Number: "},{"text":"INV-9"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Invoice Number: INV-9"));
    }

    #[test]
    fn whitespace_only_response_is_empty() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  \n"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn missing_candidates_is_empty() {
        let response: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn error_body_parses() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"error":{"message":"API key not valid"}}"#).unwrap();
        assert_eq!(response.error.unwrap().message, "API key not valid");
    }
}
