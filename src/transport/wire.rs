//! JSON bodies of the `generateContent` call.

use super::Prompt;
use crate::error::TransportError;
use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f64,
    /// Top-k cutoff.
    pub top_k: u32,
    /// Nucleus sampling mass.
    pub top_p: f64,
    /// Reply length cap.
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
        }
    }
}

/// Inline binary data in a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the data.
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

/// One piece of a message: text or inline data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// A message made of parts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Content {
    /// The parts, in order.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents; a single turn here.
    pub contents: Vec<Content>,
    /// Sampling parameters.
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Build the single-turn request for `prompt`.
    ///
    /// The text part comes first, followed by the image if there is one.
    pub fn from_prompt(prompt: &Prompt, generation_config: GenerationConfig) -> Self {
        let mut parts = vec![Part {
            text: Some(prompt.text.clone()),
            inline_data: None,
        }];
        if let Some(image) = &prompt.image {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.base64_data.clone(),
                }),
            });
        }

        Self {
            contents: vec![Content { parts }],
            generation_config,
        }
    }

    /// Serialize to a JSON body.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn to_json(&self) -> Result<String, TransportError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One candidate reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// The reply content.
    #[serde(default)]
    pub content: Content,
}

/// Response body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    /// Candidate replies, best first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Parse a JSON body.
    ///
    /// # Errors
    ///
    /// Fails if the body is not a valid response.
    pub fn from_json(body: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Text of the first part of the first candidate.
    ///
    /// # Errors
    ///
    /// Fails if there is no candidate, no part, or the part has no text.
    pub fn first_text(&self) -> Result<&str, TransportError> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
            .ok_or_else(|| TransportError::MalformedResponse("no candidate text".into()))
    }
}
