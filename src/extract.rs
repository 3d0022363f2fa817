//! The extraction orchestrator: one trigger, one request, one outcome.
//!
//! [`analyze`] is the primary entry point. It owns the request-state
//! transitions on the [`Session`] and performs the whole flow for a single
//! attempt: guards, credential resolution, ordered encoding fan-out, request
//! assembly, the network exchange, and outcome recording. Every failure is
//! terminal for the attempt — no retry, no partial result.
//!
//! The `&mut Session` receiver makes overlapping attempts impossible at
//! compile time; the [`RequestState`] guard exists on top of that because it
//! is what a host UI reads to keep its trigger disabled, and it keeps the
//! single-flight property observable.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::ExtractionReport;
use crate::pipeline::{api, encode, request};
use crate::session::{DocumentKind, RequestState, Session};
use futures::future;
use std::time::Instant;
use tracing::{debug, info};

/// Run one extraction attempt over the session's staged documents.
///
/// # State transitions
///
/// `Idle → Encoding → AwaitingResponse → Succeeded | Failed`
///
/// The terminal state is not busy, so the host's trigger re-enables once the
/// attempt is over; the outcome itself is read from
/// [`Session::result`] / [`Session::error`].
///
/// # Errors
///
/// * [`ExtractError::AnalysisInProgress`] — the state is busy (the session
///   is being driven from elsewhere); nothing is changed.
/// * [`ExtractError::NoDocumentsSelected`] — zero slots populated; recorded
///   on the session, no credential check or network activity happens.
/// * [`ExtractError::MissingApiKey`] — detected before any network call.
/// * Service errors from the exchange, including an empty model response.
pub async fn analyze(
    session: &mut Session,
    config: &ExtractionConfig,
) -> Result<ExtractionReport, ExtractError> {
    if session.request_state().is_busy() {
        return Err(ExtractError::AnalysisInProgress);
    }
    if session.staged_count() == 0 {
        let err = ExtractError::NoDocumentsSelected;
        session.record_failure(err.to_string());
        session.set_state(RequestState::Failed);
        return Err(err);
    }

    let total_start = Instant::now();
    session.clear_outcome();

    let document_count = session.staged_count();
    info!(
        "Starting analysis: {} document(s), model '{}'",
        document_count, config.model
    );
    if let Some(cb) = &config.progress_callback {
        cb.on_analysis_start(document_count);
    }

    // Credential next: a missing key must surface as a configuration error
    // before any encoding work or network traffic.
    let api_key = match config.resolve_api_key() {
        Ok(key) => key,
        Err(err) => return fail(session, config, err),
    };

    // ── Encode: per-slot fan-out, slot order preserved ───────────────────
    session.set_state(RequestState::Encoding);
    let encode_start = Instant::now();
    let encoded: Vec<(DocumentKind, encode::EncodedPart)> = {
        let staged: Vec<_> = session.staged().collect();
        // join_all keeps input order, so completion order never reorders
        // the assembled parts.
        future::join_all(staged.into_iter().map(|(kind, doc)| {
            let cb = config.progress_callback.clone();
            async move {
                let part = encode::encode_document(doc);
                if let Some(cb) = cb {
                    cb.on_document_encoded(kind, part.data.len());
                }
                (kind, part)
            }
        }))
        .await
    };
    let encode_duration_ms = encode_start.elapsed().as_millis() as u64;
    debug!("Encoded {} part(s) in {}ms", encoded.len(), encode_duration_ms);

    // ── Assemble: instruction first, then documents in slot order ────────
    let documents: Vec<DocumentKind> = encoded.iter().map(|(kind, _)| *kind).collect();
    let parts = encoded.into_iter().map(|(_, part)| part).collect();
    let request = request::assemble(&config.instruction_text(), parts, config);

    // ── Exchange: the single suspension point ────────────────────────────
    session.set_state(RequestState::AwaitingResponse);
    if let Some(cb) = &config.progress_callback {
        cb.on_request_start(request.part_count());
    }
    let api_start = Instant::now();
    let client = reqwest::Client::new();
    let outcome = api::generate(&client, config, &api_key, &request).await;
    let api_duration_ms = api_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(text) => {
            session.record_success(text.clone());
            session.set_state(RequestState::Succeeded);
            if let Some(cb) = &config.progress_callback {
                cb.on_analysis_complete(true);
            }
            let total_duration_ms = total_start.elapsed().as_millis() as u64;
            info!(
                "Analysis complete: {} chars in {}ms ({}ms api)",
                text.len(),
                total_duration_ms,
                api_duration_ms
            );
            Ok(ExtractionReport {
                text,
                model: config.model.clone(),
                documents,
                encode_duration_ms,
                api_duration_ms,
                total_duration_ms,
            })
        }
        Err(err) => fail(session, config, err),
    }
}

/// Record a failed attempt on the session and hand the error back.
///
/// The previous result stays cleared (it was invalidated at trigger time);
/// only the human-readable message is displayed.
fn fail(
    session: &mut Session,
    config: &ExtractionConfig,
    err: ExtractError,
) -> Result<ExtractionReport, ExtractError> {
    info!("Analysis failed: {}", err);
    session.record_failure(err.to_string());
    session.set_state(RequestState::Failed);
    if let Some(cb) = &config.progress_callback {
        cb.on_analysis_complete(false);
    }
    Err(err)
}
