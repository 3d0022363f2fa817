//! Output types returned by a successful extraction attempt.

use crate::session::DocumentKind;
use serde::{Deserialize, Serialize};

/// The outcome of one successful attempt.
///
/// `text` is the model's response verbatim — no post-processing, parsing, or
/// schema validation is applied to it. The remaining fields are run metadata
/// a host renders alongside the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// The returned text, exactly as the model produced it.
    pub text: String,
    /// Model identifier the request was sent to.
    pub model: String,
    /// Which slots were sent, in the order their parts appeared.
    pub documents: Vec<DocumentKind>,
    /// Milliseconds spent encoding the staged documents.
    pub encode_duration_ms: u64,
    /// Milliseconds spent in the network exchange.
    pub api_duration_ms: u64,
    /// Total attempt wall-clock milliseconds.
    pub total_duration_ms: u64,
}
