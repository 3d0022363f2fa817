//! CLI binary for tradedoc-extract.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, stages the chosen files into a `Session`, and prints
//! the result.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use tradedoc_extract::{
    analyze, load_document, DocumentKind, ErrorClass, ExtractionConfig,
    ExtractionProgressCallback, ProgressCallback, Session, DEFAULT_MODEL,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI busy indicator using indicatif ───────────────────────────────────────

/// Terminal busy indicator: a spinner that follows the attempt's phases.
/// The trigger is the command invocation itself, so the spinner is the
/// user-visible "request in flight" signal.
struct SpinnerCallback {
    bar: ProgressBar,
}

impl SpinnerCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Analyzing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for SpinnerCallback {
    fn on_analysis_start(&self, document_count: usize) {
        self.bar
            .set_message(format!("encoding {document_count} document(s)…"));
    }

    fn on_document_encoded(&self, kind: DocumentKind, encoded_len: usize) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            kind,
            dim(&format!("{} KiB encoded", encoded_len / 1024))
        ));
    }

    fn on_request_start(&self, part_count: usize) {
        self.bar
            .set_message(format!("waiting for the model ({part_count} parts sent)…"));
    }

    fn on_analysis_complete(&self, _success: bool) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse a single invoice (result to stdout)
  tradedoc --invoice invoice.pdf

  # Full document set, result to a file
  tradedoc --invoice inv.pdf --packing-list pl.jpg --bill-of-lading bol.pdf -o fields.txt

  # Custom field list and sentinel
  tradedoc --invoice inv.pdf --fields "Invoice Number,Currency" --sentinel "N/A"

  # Structured JSON report
  tradedoc --invoice inv.pdf --json > report.json

  # Copy the result to the terminal clipboard
  tradedoc --invoice inv.pdf --copy

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY        API credential (required; checked before any request)
  TRADEDOC_MODEL        Override the model ID
  TRADEDOC_FIELDS       Comma-separated field list override
  TRADEDOC_SENTINEL     Missing-field sentinel override

SETUP:
  1. Set the API key:   export GEMINI_API_KEY=...
  2. Analyse:           tradedoc --invoice invoice.pdf
"#;

/// Extract structured fields from trade documents using a vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "tradedoc",
    version,
    about = "Extract structured fields from trade documents using a vision LLM",
    long_about = "Send a commercial invoice, packing list, and/or bill of lading (images or \
PDFs) inline to a hosted vision language model with a fixed extraction instruction, and \
print the returned field report. Fields absent from the documents come back as \"Not Found\".",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Commercial invoice (image or PDF).
    #[arg(long, value_name = "FILE")]
    invoice: Option<PathBuf>,

    /// Packing list (image or PDF).
    #[arg(long, value_name = "FILE")]
    packing_list: Option<PathBuf>,

    /// Bill of lading (image or PDF).
    #[arg(long, value_name = "FILE")]
    bill_of_lading: Option<PathBuf>,

    /// Model ID (e.g. gemini-1.5-flash, gemini-1.5-pro).
    #[arg(long, env = "TRADEDOC_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Comma-separated list of fields to extract (overrides the built-in list).
    #[arg(long, env = "TRADEDOC_FIELDS")]
    fields: Option<String>,

    /// Sentinel reported for fields missing from the documents.
    #[arg(long, env = "TRADEDOC_SENTINEL")]
    sentinel: Option<String>,

    /// Path to a text file containing a full custom instruction.
    #[arg(long, env = "TRADEDOC_INSTRUCTION")]
    instruction: Option<PathBuf>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "TRADEDOC_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Max model output tokens.
    #[arg(long, env = "TRADEDOC_MAX_TOKENS", default_value_t = 8192)]
    max_output_tokens: u32,

    /// Write the result to this file instead of stdout.
    #[arg(short, long, env = "TRADEDOC_OUTPUT")]
    output: Option<PathBuf>,

    /// Copy the result to the terminal clipboard (OSC 52).
    #[arg(long)]
    copy: bool,

    /// Output a structured JSON report instead of plain text.
    #[arg(long, env = "TRADEDOC_JSON")]
    json: bool,

    /// Disable the busy indicator.
    #[arg(long, env = "TRADEDOC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TRADEDOC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, env = "TRADEDOC_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // spinner provides the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Stage the chosen files ───────────────────────────────────────────
    let mut session = Session::new();
    let selections = [
        (DocumentKind::Invoice, cli.invoice.as_ref()),
        (DocumentKind::PackingList, cli.packing_list.as_ref()),
        (DocumentKind::BillOfLading, cli.bill_of_lading.as_ref()),
    ];
    for (kind, path) in selections {
        if let Some(path) = path {
            match load_document(path).await {
                Ok(doc) => {
                    if !cli.quiet {
                        eprintln!(
                            "{} staged {}: {} {}",
                            green("✓"),
                            kind,
                            bold(&doc.file_name),
                            dim(&format!("({} bytes, {})", doc.size, doc.mime_type)),
                        );
                    }
                    session.select(kind, doc);
                }
                Err(err) => return render_failure(err.class(), &err.to_string()),
            }
        }
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli, show_progress.then(SpinnerCallback::new)).await?;

    // ── Trigger the analysis ─────────────────────────────────────────────
    let report = match analyze(&mut session, &config).await {
        Ok(report) => report,
        Err(err) => {
            // The session holds the same message; render it once, with a
            // class-specific hint.
            return render_failure(err.class(), session.error().unwrap_or(&err.to_string()));
        }
    };

    // ── Render the result ────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if let Some(ref path) = cli.output {
        tokio::fs::write(path, &report.text)
            .await
            .with_context(|| format!("Failed to write result to {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} result written to {}", green("✔"), bold(&path.display().to_string()));
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(report.text.as_bytes())
            .context("Failed to write to stdout")?;
        if !report.text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if cli.copy {
        if let Some(text) = session.press_copy(Instant::now()) {
            // OSC 52 hands the text to the hosting terminal's clipboard.
            eprint!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()));
            eprintln!("{} result copied to clipboard", green("✔"));
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "   {}",
            dim(&format!(
                "{} document(s) → {} in {}ms ({}ms model)",
                report.documents.len(),
                report.model,
                report.total_duration_ms,
                report.api_duration_ms
            ))
        );
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
async fn build_config(cli: &Cli, progress: Option<Arc<SpinnerCallback>>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .model(cli.model.clone())
        .temperature(cli.temperature)
        .max_output_tokens(cli.max_output_tokens);

    if let Some(ref fields) = cli.fields {
        let fields: Vec<String> = fields
            .split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        builder = builder.fields(fields);
    }
    if let Some(ref sentinel) = cli.sentinel {
        builder = builder.sentinel(sentinel.clone());
    }
    if let Some(ref path) = cli.instruction {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read instruction from {}", path.display()))?;
        builder = builder.instruction(text);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

/// Print a failed attempt the way the form's alert region would: the
/// message itself, then a hint matched to the error class.
fn render_failure(class: ErrorClass, message: &str) -> Result<()> {
    eprintln!("{} {}", red("✘"), message);
    let hint = match class {
        ErrorClass::UserInput => "adjust the staged documents and run again",
        ErrorClass::Configuration => "fix the configuration, then run again",
        ErrorClass::Service => "the model service failed; run again when it recovers",
    };
    eprintln!("   {}", dim(hint));
    std::process::exit(1)
}
