//! Session state: the three upload slots, the request-state machine, and
//! the copy affordance.
//!
//! A [`Session`] is the host-facing analogue of the form the operator sees:
//! it owns the staged documents, the most recent result or error, and the
//! request state the host reads to enable or disable its trigger control.
//! The orchestrator ([`crate::extract::analyze`]) is the only writer of the
//! request state; hosts only read it.
//!
//! Everything here lives for the lifetime of the `Session` value — nothing
//! is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// The three fixed document roles, in canonical slot order.
///
/// Slot order is a wire-level contract: encoded parts are always assembled
/// invoice, packing list, bill of lading, whatever order the operator staged
/// them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Invoice,
    PackingList,
    BillOfLading,
}

impl DocumentKind {
    /// All kinds in canonical slot order.
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Invoice,
        DocumentKind::PackingList,
        DocumentKind::BillOfLading,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "commercial invoice",
            DocumentKind::PackingList => "packing list",
            DocumentKind::BillOfLading => "bill of lading",
        }
    }

    fn slot_index(&self) -> usize {
        match self {
            DocumentKind::Invoice => 0,
            DocumentKind::PackingList => 1,
            DocumentKind::BillOfLading => 2,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A document staged into a slot: name, size, MIME type, and content bytes.
///
/// The content is held in memory for the lifetime of the selection, exactly
/// long enough to encode it into the request.
#[derive(Clone)]
pub struct StagedDocument {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl StagedDocument {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }
}

impl fmt::Debug for StagedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedDocument")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish()
    }
}

/// Request state, driven solely by the orchestrator.
///
/// `Succeeded` and `Failed` are recorded as the attempt's outcome and the
/// state then returns to `Idle`, so the trigger control re-enables once the
/// attempt is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestState {
    #[default]
    Idle,
    Encoding,
    AwaitingResponse,
    Succeeded,
    Failed,
}

impl RequestState {
    /// True while an attempt is in flight (trigger must stay disabled).
    pub fn is_busy(&self) -> bool {
        matches!(self, RequestState::Encoding | RequestState::AwaitingResponse)
    }
}

/// How long the copy control shows its confirmation label before reverting.
pub const COPY_LABEL_REVERT_AFTER: Duration = Duration::from_secs(2);

/// Confirmation-label state for the copy control.
///
/// Pressing with a non-empty result yields that exact text for the host to
/// place on its clipboard and flips the label to "Copied!"; the label reads
/// as "Copy" again once [`COPY_LABEL_REVERT_AFTER`] has elapsed. Time is
/// passed in by the caller so the revert is testable without sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyAffordance {
    pressed_at: Option<Instant>,
}

impl CopyAffordance {
    /// Press the control. Returns the text to copy, or `None` when there is
    /// no result to copy (the label does not change in that case).
    pub fn press(&mut self, result: Option<&str>, now: Instant) -> Option<String> {
        let text = result.filter(|t| !t.is_empty())?;
        self.pressed_at = Some(now);
        Some(text.to_string())
    }

    /// The label to render at `now`.
    pub fn label(&self, now: Instant) -> &'static str {
        match self.pressed_at {
            Some(at) if now.duration_since(at) < COPY_LABEL_REVERT_AFTER => "Copied!",
            _ => "Copy",
        }
    }

    fn reset(&mut self) {
        self.pressed_at = None;
    }
}

/// One operator session: three slots, the latest outcome, the request state.
#[derive(Debug, Default)]
pub struct Session {
    slots: [Option<StagedDocument>; 3],
    state: RequestState,
    result: Option<String>,
    error: Option<String>,
    copy: CopyAffordance,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a document into its slot, overwriting any prior selection.
    ///
    /// Any previously displayed result or error is cleared and the request
    /// state returns to `Idle`: a new selection invalidates whatever the
    /// last attempt showed.
    pub fn select(&mut self, kind: DocumentKind, doc: StagedDocument) {
        self.slots[kind.slot_index()] = Some(doc);
        self.state = RequestState::Idle;
        self.result = None;
        self.error = None;
        self.copy.reset();
    }

    /// The document currently staged for `kind`, if any.
    pub fn document(&self, kind: DocumentKind) -> Option<&StagedDocument> {
        self.slots[kind.slot_index()].as_ref()
    }

    /// Populated slots in canonical order (invoice, packing list, bill of
    /// lading), regardless of the order they were staged in.
    pub fn staged(&self) -> impl Iterator<Item = (DocumentKind, &StagedDocument)> {
        DocumentKind::ALL
            .into_iter()
            .filter_map(|kind| self.document(kind).map(move |doc| (kind, doc)))
    }

    /// Number of populated slots.
    pub fn staged_count(&self) -> usize {
        self.staged().count()
    }

    /// Current request state.
    pub fn request_state(&self) -> RequestState {
        self.state
    }

    /// True when the trigger control should be enabled: at least one slot
    /// populated and no attempt in flight.
    pub fn can_analyze(&self) -> bool {
        self.staged_count() > 0 && !self.state.is_busy()
    }

    /// The latest successful result text, verbatim as returned by the model.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// The latest failure message, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Press the copy control at `now`; yields the exact result text when
    /// there is one.
    pub fn press_copy(&mut self, now: Instant) -> Option<String> {
        self.copy.press(self.result.as_deref(), now)
    }

    /// Label for the copy control at `now`.
    pub fn copy_label(&self, now: Instant) -> &'static str {
        self.copy.label(now)
    }

    pub(crate) fn set_state(&mut self, state: RequestState) {
        self.state = state;
    }

    /// Clear the previous attempt's outcome at trigger time.
    pub(crate) fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
        self.copy.reset();
    }

    pub(crate) fn record_success(&mut self, text: String) {
        self.result = Some(text);
        self.error = None;
    }

    pub(crate) fn record_failure(&mut self, message: String) {
        self.result = None;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> StagedDocument {
        StagedDocument::new(name, "application/pdf", b"%PDF-1.4 stub".to_vec())
    }

    #[test]
    fn empty_session_cannot_analyze() {
        let session = Session::new();
        assert_eq!(session.staged_count(), 0);
        assert!(!session.can_analyze());
    }

    #[test]
    fn selection_overwrites_slot() {
        let mut session = Session::new();
        session.select(DocumentKind::Invoice, doc("inv_v1.pdf"));
        session.select(DocumentKind::Invoice, doc("inv_v2.pdf"));
        assert_eq!(session.staged_count(), 1);
        assert_eq!(
            session.document(DocumentKind::Invoice).unwrap().file_name,
            "inv_v2.pdf"
        );
    }

    #[test]
    fn selection_clears_stale_outcome() {
        let mut session = Session::new();
        session.select(DocumentKind::Invoice, doc("inv.pdf"));
        session.record_success("Invoice Number: INV-1".into());
        assert!(session.result().is_some());

        session.select(DocumentKind::PackingList, doc("pl.pdf"));
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn selection_clears_stale_error() {
        let mut session = Session::new();
        session.select(DocumentKind::Invoice, doc("inv.pdf"));
        session.record_failure("network down".into());
        assert!(session.error().is_some());

        session.select(DocumentKind::Invoice, doc("inv2.pdf"));
        assert!(session.error().is_none());
    }

    #[test]
    fn staged_order_is_canonical_not_selection_order() {
        let mut session = Session::new();
        session.select(DocumentKind::BillOfLading, doc("bol.pdf"));
        session.select(DocumentKind::Invoice, doc("inv.pdf"));

        let kinds: Vec<DocumentKind> = session.staged().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![DocumentKind::Invoice, DocumentKind::BillOfLading]);
    }

    #[test]
    fn busy_state_disables_trigger() {
        let mut session = Session::new();
        session.select(DocumentKind::Invoice, doc("inv.pdf"));
        assert!(session.can_analyze());

        session.set_state(RequestState::Encoding);
        assert!(!session.can_analyze());
        session.set_state(RequestState::AwaitingResponse);
        assert!(!session.can_analyze());

        session.set_state(RequestState::Idle);
        assert!(session.can_analyze());
    }

    #[test]
    fn copy_with_no_result_is_a_noop() {
        let mut session = Session::new();
        let now = Instant::now();
        assert_eq!(session.press_copy(now), None);
        assert_eq!(session.copy_label(now), "Copy");
    }

    #[test]
    fn copy_yields_exact_text_and_label_reverts() {
        let mut session = Session::new();
        session.select(DocumentKind::Invoice, doc("inv.pdf"));
        session.record_success("Invoice Number: INV-42\nCurrency: USD".into());

        let t0 = Instant::now();
        let copied = session.press_copy(t0);
        assert_eq!(copied.as_deref(), Some("Invoice Number: INV-42\nCurrency: USD"));
        assert_eq!(session.copy_label(t0), "Copied!");

        // Still confirming just before the revert deadline.
        let almost = t0 + COPY_LABEL_REVERT_AFTER - Duration::from_millis(1);
        assert_eq!(session.copy_label(almost), "Copied!");

        let after = t0 + COPY_LABEL_REVERT_AFTER;
        assert_eq!(session.copy_label(after), "Copy");
    }

    #[test]
    fn staged_document_debug_omits_bytes() {
        let d = doc("inv.pdf");
        let dbg = format!("{d:?}");
        assert!(dbg.contains("inv.pdf"));
        assert!(!dbg.contains("PDF-1.4"));
    }
}
