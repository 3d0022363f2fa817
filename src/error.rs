//! Error types for the tradedoc-extract library.
//!
//! A single fatal error enum, [`ExtractError`], covers the whole flow: every
//! failure is terminal for the attempt (there is no retry and no partial
//! result to salvage), so there is nothing to gain from a second, non-fatal
//! error type.
//!
//! Errors fall into three classes, exposed via [`ExtractError::class`]:
//!
//! * [`ErrorClass::UserInput`] — recoverable by the operator (stage a file,
//!   wait for the running attempt, pick a supported file type).
//! * [`ErrorClass::Configuration`] — requires operator action outside the
//!   tool (set the API key). Detected before any network call.
//! * [`ErrorClass::Service`] — the transport or the model API failed;
//!   includes an empty model response, which is treated as a failure rather
//!   than rendered as a blank result.
//!
//! The class lets a host pick a hint ("select a file" vs. "export
//! GEMINI_API_KEY=…") without matching on every variant.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse error taxonomy for rendering hints in a host UI or CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Recoverable by the operator within the tool.
    UserInput,
    /// Requires operator action outside the tool (environment, credentials).
    Configuration,
    /// The transport or the remote model API failed.
    Service,
}

/// All errors returned by the tradedoc-extract library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── User-input errors ─────────────────────────────────────────────────
    /// Analysis was triggered with no document staged in any slot.
    #[error("No documents staged.\nStage at least one of: invoice, packing list, bill of lading.")]
    NoDocumentsSelected,

    /// Analysis was triggered while a previous attempt is still in flight.
    #[error("An analysis is already in progress; wait for it to finish.")]
    AnalysisInProgress,

    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file is neither an image nor a PDF.
    #[error("Unsupported document type for '{path}': {detail}\nSupported: PDF, PNG, JPEG, WebP, GIF.")]
    UnsupportedMediaType { path: PathBuf, detail: String },

    /// The file exists but contains no bytes.
    #[error("Document '{path}' is empty.")]
    EmptyFile { path: PathBuf },

    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key was configured or found in the environment.
    #[error("API key is not configured.\nSet {var}=… (get a key from https://ai.google.dev/) or pass one explicitly.")]
    MissingApiKey { var: &'static str },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Service errors ────────────────────────────────────────────────────
    /// The HTTP exchange itself failed (connection, TLS, DNS, …).
    #[error("Request to the model service failed: {reason}\nCheck your internet connection.")]
    Transport { reason: String },

    /// The model API answered with a non-success status or an error body.
    #[error("Model API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// The model API answered successfully but returned no text.
    #[error("The model returned an empty response.\nTry again, or try clearer document scans.")]
    EmptyResponse,
}

impl ExtractError {
    /// Classify this error for hint rendering.
    pub fn class(&self) -> ErrorClass {
        match self {
            ExtractError::NoDocumentsSelected
            | ExtractError::AnalysisInProgress
            | ExtractError::FileNotFound { .. }
            | ExtractError::PermissionDenied { .. }
            | ExtractError::UnsupportedMediaType { .. }
            | ExtractError::EmptyFile { .. } => ErrorClass::UserInput,
            ExtractError::MissingApiKey { .. } | ExtractError::InvalidConfig(_) => {
                ErrorClass::Configuration
            }
            ExtractError::Transport { .. }
            | ExtractError::ApiError { .. }
            | ExtractError::EmptyResponse => ErrorClass::Service,
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(e: reqwest::Error) -> Self {
        ExtractError::Transport {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_configuration() {
        let e = ExtractError::MissingApiKey {
            var: "GEMINI_API_KEY",
        };
        assert_eq!(e.class(), ErrorClass::Configuration);
        assert!(e.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn no_documents_is_user_input() {
        let e = ExtractError::NoDocumentsSelected;
        assert_eq!(e.class(), ErrorClass::UserInput);
        assert!(e.to_string().contains("invoice"));
    }

    #[test]
    fn api_error_display() {
        let e = ExtractError::ApiError {
            status: 400,
            message: "invalid argument".into(),
        };
        assert_eq!(e.class(), ErrorClass::Service);
        assert!(e.to_string().contains("400"));
        assert!(e.to_string().contains("invalid argument"));
    }

    #[test]
    fn empty_response_is_service() {
        assert_eq!(ExtractError::EmptyResponse.class(), ErrorClass::Service);
    }

    #[test]
    fn unsupported_media_type_display() {
        let e = ExtractError::UnsupportedMediaType {
            path: PathBuf::from("notes.txt"),
            detail: "text/plain".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("notes.txt"));
        assert!(msg.contains("PDF"));
    }
}
