//! Transport: the boundary to the model and to platform capabilities.
//!
//! The session only ever sees [`Prompt`] going out and [`Reply`] or
//! [`TransportError`] coming back. How the request travels is up to the
//! [`Transport`] implementation; [`GenerateContentTransport`] shapes the JSON
//! of a `generateContent` call and leaves the HTTP round trip to an
//! [`HttpClient`].
//!
//! Image capture and clipboard access are injected the same way, through
//! [`ImageCapture`] and [`Clipboard`].

mod attachment;
mod wire;

pub use attachment::{ImageAttachment, ImagePayload, MAX_ATTACHMENT_BYTES};
pub use wire::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};

use crate::error::{CapabilityError, TransportError};
use crate::transcript::Source;

/// An outgoing prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Prompt text, never empty.
    pub text: String,
    /// Optional inline image.
    pub image: Option<ImagePayload>,
}

/// A complete reply. Replies arrive whole, never streamed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    /// Reply text, revealed incrementally.
    pub text: String,
    /// References shown under the reply.
    pub sources: Vec<Source>,
}

impl Reply {
    /// A reply with no sources.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

/// Sends a prompt and blocks until the whole reply is back.
pub trait Transport: Send + Sync {
    /// Run one request.
    ///
    /// # Errors
    ///
    /// Any failure, including a non-success status.
    fn generate(&self, prompt: &Prompt) -> Result<Reply, TransportError>;
}

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

/// Posts a JSON body to the configured endpoint.
pub trait HttpClient: Send + Sync {
    /// POST `body` with `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Connection-level failures only; any status is a response.
    fn post_json(&self, body: &str) -> Result<HttpResponse, TransportError>;
}

/// A [`Transport`] speaking the `generateContent` JSON protocol.
pub struct GenerateContentTransport<C> {
    client: C,
    generation_config: GenerationConfig,
    sources: Vec<Source>,
}

impl<C: HttpClient> GenerateContentTransport<C> {
    /// Wrap `client` with the default sampling parameters.
    pub fn new(client: C) -> Self {
        Self {
            client,
            generation_config: GenerationConfig::default(),
            sources: Vec::new(),
        }
    }

    /// Override the sampling parameters.
    #[must_use]
    pub fn with_generation_config(mut self, generation_config: GenerationConfig) -> Self {
        self.generation_config = generation_config;
        self
    }

    /// Attach these sources to every reply.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }
}

impl<C: HttpClient> Transport for GenerateContentTransport<C> {
    fn generate(&self, prompt: &Prompt) -> Result<Reply, TransportError> {
        let body = GenerateContentRequest::from_prompt(prompt, self.generation_config).to_json()?;
        let response = self.client.post_json(&body)?;

        if !(200..300).contains(&response.status) {
            tracing::warn!(status = response.status, "generateContent failed");
            return Err(TransportError::Status(response.status));
        }

        let parsed = GenerateContentResponse::from_json(&response.body)?;
        Ok(Reply {
            text: parsed.first_text()?.to_owned(),
            sources: self.sources.clone(),
        })
    }
}

/// Produces a still image on demand, e.g. from a camera.
pub trait ImageCapture {
    /// Capture one image.
    ///
    /// # Errors
    ///
    /// The device is unavailable or permission was refused.
    fn capture(&mut self) -> Result<ImageAttachment, CapabilityError>;
}

/// Writes text to the system clipboard.
pub trait Clipboard {
    /// Replace the clipboard contents.
    ///
    /// # Errors
    ///
    /// The clipboard could not be written.
    fn write_text(&mut self, text: &str) -> Result<(), CapabilityError>;
}
