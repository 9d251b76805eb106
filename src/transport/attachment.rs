//! Image attachments carried as base64 data URIs.

use crate::error::AttachmentError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Largest accepted image, in decoded bytes.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Inline image data as sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// MIME type such as `image/jpeg`.
    pub mime_type: String,
    /// Base64 without the data URI prefix.
    pub base64_data: String,
}

/// A validated image attached to the next prompt.
///
/// Keeps the original data URI for display in the transcript and the split
/// payload for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    data_uri: String,
    payload: ImagePayload,
    size: usize,
}

impl ImageAttachment {
    /// Validate a `data:<mime>;base64,<payload>` URI against `limit` bytes.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a base64 data URI, the MIME type is not an
    /// image type, the payload does not decode, or the decoded image is
    /// larger than `limit`.
    pub fn from_data_uri(data_uri: impl Into<String>, limit: usize) -> Result<Self, AttachmentError> {
        let data_uri = data_uri.into();
        let rest = data_uri.strip_prefix("data:").ok_or(AttachmentError::NotDataUri)?;
        let (header, data) = rest.split_once(',').ok_or(AttachmentError::NotDataUri)?;
        let mime_type = header.strip_suffix(";base64").ok_or(AttachmentError::NotDataUri)?;

        if !mime_type.starts_with("image/") {
            return Err(AttachmentError::UnsupportedType(mime_type.to_owned()));
        }

        let size = STANDARD.decode(data)?.len();
        if size > limit {
            return Err(AttachmentError::TooLarge { size, limit });
        }

        let payload = ImagePayload {
            mime_type: mime_type.to_owned(),
            base64_data: data.to_owned(),
        };
        Ok(Self {
            data_uri,
            payload,
            size,
        })
    }

    /// Encode raw image bytes as an attachment.
    ///
    /// # Errors
    ///
    /// Fails for non-image MIME types or images larger than `limit`.
    pub fn from_bytes(mime_type: &str, bytes: &[u8], limit: usize) -> Result<Self, AttachmentError> {
        if !mime_type.starts_with("image/") {
            return Err(AttachmentError::UnsupportedType(mime_type.to_owned()));
        }
        if bytes.len() > limit {
            return Err(AttachmentError::TooLarge {
                size: bytes.len(),
                limit,
            });
        }

        let base64_data = STANDARD.encode(bytes);
        Ok(Self {
            data_uri: format!("data:{mime_type};base64,{base64_data}"),
            payload: ImagePayload {
                mime_type: mime_type.to_owned(),
                base64_data,
            },
            size: bytes.len(),
        })
    }

    /// The full data URI, as shown in the transcript.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// The payload for the request.
    pub const fn payload(&self) -> &ImagePayload {
        &self.payload
    }

    /// Decoded size in bytes.
    pub const fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_split() {
        let attachment = ImageAttachment::from_data_uri("data:image/png;base64,aGk=", MAX_ATTACHMENT_BYTES).unwrap();
        assert_eq!(attachment.payload().mime_type, "image/png");
        assert_eq!(attachment.payload().base64_data, "aGk=");
        assert_eq!(attachment.size(), 2);
    }

    #[test]
    fn test_rejects_non_images() {
        let err = ImageAttachment::from_data_uri("data:text/plain;base64,aGk=", MAX_ATTACHMENT_BYTES).unwrap_err();
        assert!(matches!(err, AttachmentError::UnsupportedType(t) if t == "text/plain"));
        assert!(matches!(
            ImageAttachment::from_data_uri("hello", MAX_ATTACHMENT_BYTES),
            Err(AttachmentError::NotDataUri)
        ));
        assert!(matches!(
            ImageAttachment::from_data_uri("data:image/png,raw", MAX_ATTACHMENT_BYTES),
            Err(AttachmentError::NotDataUri)
        ));
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(matches!(
            ImageAttachment::from_data_uri("data:image/png;base64,@@@", MAX_ATTACHMENT_BYTES),
            Err(AttachmentError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_size_limit() {
        let bytes = vec![0u8; MAX_ATTACHMENT_BYTES + 1];
        let err = ImageAttachment::from_bytes("image/jpeg", &bytes, MAX_ATTACHMENT_BYTES).unwrap_err();
        assert_eq!(
            err.to_string(),
            "File too large. Please upload an image smaller than 5 MB."
        );

        let ok = ImageAttachment::from_bytes("image/jpeg", &bytes[1..], MAX_ATTACHMENT_BYTES).unwrap();
        assert!(ok.data_uri().starts_with("data:image/jpeg;base64,"));
    }
}
