//! Error types.
//!
//! Parsing never fails and has no error type. Everything that can fail does
//! so at a boundary: the transport, an attachment, a capability, or an
//! out-of-order transcript update.

use crate::transcript::MessageId;
use thiserror::Error;

/// Failure of the remote generation call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("API request failed with status {0}")]
    Status(u16),

    /// The request could not be sent or the connection failed.
    #[error("transport failure: {0}")]
    Failed(String),

    /// The response body did not contain a reply.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

/// An image attachment that cannot be sent.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// The value is not a `data:<mime>;base64,<payload>` URI.
    #[error("not a base64 data URI")]
    NotDataUri,

    /// The MIME type is not an image type.
    #[error("unsupported attachment type {0}")]
    UnsupportedType(String),

    /// The payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded image exceeds the size limit.
    #[error("File too large. Please upload an image smaller than {} MB.", .limit / (1024 * 1024))]
    TooLarge {
        /// Decoded size in bytes.
        size: usize,
        /// Limit in bytes.
        limit: usize,
    },
}

/// An out-of-order update to the transcript.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranscriptError {
    /// No message has this id.
    #[error("unknown message {0}")]
    UnknownMessage(MessageId),

    /// The message exists but is no longer open for growth.
    #[error("message {0} is closed")]
    Closed(MessageId),

    /// The update would shrink or rewrite existing content.
    #[error("update to {id} is not a prefix extension ({current} -> {proposed} bytes)")]
    NotPrefixExtension {
        /// Message being updated.
        id: MessageId,
        /// Current content length.
        current: usize,
        /// Proposed content length.
        proposed: usize,
    },
}

/// Failure of an injected platform capability.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Capturing an image failed, e.g. no camera permission.
    #[error("unable to capture image: {0}")]
    Capture(String),

    /// Writing to the clipboard failed.
    #[error("failed to copy to clipboard: {0}")]
    Clipboard(String),

    /// There is nothing to copy.
    #[error("nothing to copy")]
    Empty,
}

/// Errors surfaced by the chat session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A transcript update was rejected.
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    /// An attachment was rejected.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    /// A capability failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// A prompt was submitted while a request is in flight.
    #[error("a request is already in flight")]
    Busy,
}
