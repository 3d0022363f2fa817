//! Part encoding: staged document bytes → base64 wrapped with a MIME type.
//!
//! The model API accepts files inline as base64 strings embedded in the JSON
//! request body, each paired with its MIME type. Documents are sent exactly
//! as staged — no recompression or resizing — so what the model reads is
//! what the operator chose.

use crate::session::StagedDocument;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// A document's content ready for inline transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPart {
    pub mime_type: String,
    pub data: String,
}

/// Encode a staged document as a base64 part.
pub fn encode_document(doc: &StagedDocument) -> EncodedPart {
    let data = STANDARD.encode(&doc.bytes);
    debug!(
        "Encoded '{}' → {} bytes base64 ({})",
        doc.file_name,
        data.len(),
        doc.mime_type
    );
    EncodedPart {
        mime_type: doc.mime_type.clone(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_bytes_as_standard_base64() {
        let doc = StagedDocument::new("inv.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        let part = encode_document(&doc);
        assert_eq!(part.mime_type, "application/pdf");
        assert_eq!(part.data, "JVBERi0xLjQ=");
        // Round-trips back to the original bytes.
        assert_eq!(STANDARD.decode(&part.data).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn mime_type_is_carried_through() {
        let doc = StagedDocument::new("scan.png", "image/png", vec![0x89, b'P', b'N', b'G']);
        let part = encode_document(&doc);
        assert_eq!(part.mime_type, "image/png");
        assert!(!part.data.is_empty());
    }
}
