//! Configuration types for a document-extraction attempt.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across attempts and to diff two runs when their
//! outputs differ.
//!
//! # Design choice: builder over constructor
//! The defaults reproduce the fixed-prompt, pinned-model behaviour most
//! callers want; the builder lets the rest set only what they care about.

use crate::error::ExtractError;
use crate::progress::ExtractionProgressCallback;
use crate::prompts;
use std::fmt;
use std::sync::Arc;

/// Environment variable consulted for the API credential when no explicit
/// key is configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default API base URL (overridable so tests can point at a local server).
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for one extraction attempt.
///
/// # Example
/// ```rust
/// use tradedoc_extract::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .model("gemini-1.5-pro")
///     .sentinel("N/A")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Model identifier appended to the `models/` API path. Default:
    /// [`DEFAULT_MODEL`].
    pub model: String,

    /// Base URL of the generative-language API. Default:
    /// [`DEFAULT_API_BASE_URL`]. Tests point this at a mock server.
    pub api_base_url: String,

    /// Explicit API key. When `None`, [`API_KEY_ENV`] is read at trigger
    /// time; absence is a configuration error reported before any network
    /// call.
    pub api_key: Option<String>,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Low temperature keeps the model faithful to what is printed on the
    /// documents, which is what field extraction wants.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    pub max_output_tokens: u32,

    /// Fields the instruction asks the model to extract. Default:
    /// [`prompts::DEFAULT_FIELDS`].
    pub fields: Vec<String>,

    /// Sentinel reported for fields absent from the documents. Default:
    /// [`prompts::DEFAULT_SENTINEL`].
    pub sentinel: String,

    /// Full instruction override. When set, `fields` and `sentinel` are not
    /// used and this text is sent as the leading part verbatim.
    pub instruction: Option<String>,

    /// Progress callback for host busy indicators. Default: none.
    pub progress_callback: Option<Arc<dyn ExtractionProgressCallback>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            temperature: 0.1,
            max_output_tokens: 8192,
            fields: prompts::DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect(),
            sentinel: prompts::DEFAULT_SENTINEL.to_string(),
            instruction: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("fields", &self.fields.len())
            .field("sentinel", &self.sentinel)
            .field("instruction", &self.instruction.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The instruction text sent as the leading request part.
    pub fn instruction_text(&self) -> String {
        match &self.instruction {
            Some(text) => text.clone(),
            None => prompts::build_instruction(&self.fields, &self.sentinel),
        }
    }

    /// Resolve the API credential: explicit key first, then [`API_KEY_ENV`].
    ///
    /// Called at trigger time, before any encoding or network activity, so a
    /// missing credential surfaces as a configuration error rather than a
    /// transport one.
    pub fn resolve_api_key(&self) -> Result<String, ExtractError> {
        if let Some(key) = self.api_key.as_deref() {
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(ExtractError::MissingApiKey { var: API_KEY_ENV }),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n.max(1);
        self
    }

    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.config.fields = fields;
        self
    }

    pub fn sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.config.sentinel = sentinel.into();
        self
    }

    pub fn instruction(mut self, text: impl Into<String>) -> Self {
        self.config.instruction = Some(text.into());
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn ExtractionProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(ExtractError::InvalidConfig("model must not be empty".into()));
        }
        if c.api_base_url.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "api_base_url must not be empty".into(),
            ));
        }
        if c.instruction.is_none() {
            if c.fields.is_empty() {
                return Err(ExtractError::InvalidConfig(
                    "field list must not be empty (or set a full instruction override)".into(),
                ));
            }
            if c.sentinel.trim().is_empty() {
                return Err(ExtractError::InvalidConfig(
                    "sentinel must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
