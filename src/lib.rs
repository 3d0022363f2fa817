//! # tradedoc-extract
//!
//! Extract structured fields from trade documents — commercial invoice,
//! packing list, bill of lading — using a hosted vision language model.
//!
//! ## Why this crate?
//!
//! Trade documents arrive as scans and phone photos in every layout a
//! freight forwarder has ever invented; template-based parsers break on each
//! new supplier. Instead this crate sends the documents inline to a vision
//! LLM with one fixed instruction and renders the model's answer verbatim,
//! with any missing field reported as "Not Found" rather than omitted.
//!
//! ## Flow Overview
//!
//! ```text
//! documents (≤ 3 slots: invoice, packing list, bill of lading)
//!  │
//!  ├─ 1. Stage    load each chosen file, constrain to image/PDF
//!  ├─ 2. Encode   bytes → base64 parts, slot order preserved
//!  ├─ 3. Assemble instruction text + parts → one request
//!  ├─ 4. Exchange single generateContent call (the only suspension point)
//!  └─ 5. Outcome  verbatim text, or one human-readable error
//! ```
//!
//! One attempt at a time, no retries, nothing persisted: the whole flow is
//! [`Session`] state plus a single request/response exchange.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tradedoc_extract::{analyze, load_document, DocumentKind, ExtractionConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from GEMINI_API_KEY
//!     let config = ExtractionConfig::default();
//!
//!     let mut session = Session::new();
//!     session.select(DocumentKind::Invoice, load_document("invoice.pdf").await?);
//!     session.select(DocumentKind::BillOfLading, load_document("bol.jpg").await?);
//!
//!     let report = analyze(&mut session, &config).await?;
//!     println!("{}", report.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `tradedoc` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! tradedoc-extract = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, API_KEY_ENV, DEFAULT_MODEL};
pub use error::{ErrorClass, ExtractError};
pub use extract::analyze;
pub use output::ExtractionReport;
pub use pipeline::input::load_document;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::{
    CopyAffordance, DocumentKind, RequestState, Session, StagedDocument, COPY_LABEL_REVERT_AFTER,
};
