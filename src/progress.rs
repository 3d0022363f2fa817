//! Progress-callback trait for per-attempt events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the orchestrator moves an attempt through its phases.
//!
//! # Why callbacks instead of channels?
//!
//! The callback is the least-invasive integration point: hosts can forward
//! events to a terminal spinner, a WebSocket, or a repaint request without
//! the library knowing how the host communicates. The trait is `Send + Sync`
//! because per-document encoding futures may run on different worker
//! threads. All methods default to no-ops so callers only override what they
//! care about.

use crate::session::DocumentKind;
use std::sync::Arc;

/// Called by the orchestrator as an attempt progresses.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once at trigger time, after the guards have passed.
    ///
    /// # Arguments
    /// * `document_count` — number of staged documents that will be sent
    fn on_analysis_start(&self, document_count: usize) {
        let _ = document_count;
    }

    /// Called when one staged document has been encoded.
    ///
    /// # Arguments
    /// * `kind`        — which slot the document came from
    /// * `encoded_len` — byte length of the base64 payload
    fn on_document_encoded(&self, kind: DocumentKind, encoded_len: usize) {
        let _ = (kind, encoded_len);
    }

    /// Called just before the request is submitted — the start of the single
    /// suspension point. Hosts typically switch their busy indicator to a
    /// "waiting on the model" message here.
    ///
    /// # Arguments
    /// * `part_count` — parts in the request body (instruction + documents)
    fn on_request_start(&self, part_count: usize) {
        let _ = part_count;
    }

    /// Called once when the attempt finishes, success or failure.
    ///
    /// # Arguments
    /// * `success` — whether a non-empty result was obtained
    fn on_analysis_complete(&self, success: bool) {
        let _ = success;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct TrackingCallback {
        started_with: AtomicUsize,
        encoded: AtomicUsize,
        request_parts: AtomicUsize,
        finished_ok: AtomicBool,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_analysis_start(&self, document_count: usize) {
            self.started_with.store(document_count, Ordering::SeqCst);
        }

        fn on_document_encoded(&self, _kind: DocumentKind, _encoded_len: usize) {
            self.encoded.fetch_add(1, Ordering::SeqCst);
        }

        fn on_request_start(&self, part_count: usize) {
            self.request_parts.store(part_count, Ordering::SeqCst);
        }

        fn on_analysis_complete(&self, success: bool) {
            self.finished_ok.store(success, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_analysis_start(2);
        cb.on_document_encoded(DocumentKind::Invoice, 1024);
        cb.on_request_start(3);
        cb.on_analysis_complete(true);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let cb = TrackingCallback {
            started_with: AtomicUsize::new(0),
            encoded: AtomicUsize::new(0),
            request_parts: AtomicUsize::new(0),
            finished_ok: AtomicBool::new(false),
        };

        cb.on_analysis_start(2);
        cb.on_document_encoded(DocumentKind::Invoice, 100);
        cb.on_document_encoded(DocumentKind::BillOfLading, 200);
        cb.on_request_start(3);
        cb.on_analysis_complete(true);

        assert_eq!(cb.started_with.load(Ordering::SeqCst), 2);
        assert_eq!(cb.encoded.load(Ordering::SeqCst), 2);
        assert_eq!(cb.request_parts.load(Ordering::SeqCst), 3);
        assert!(cb.finished_ok.load(Ordering::SeqCst));
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_analysis_start(1);
        cb.on_analysis_complete(false);
    }
}
