//! Upload validation.
//!
//! An upload is accepted when its filename carries the configured extension
//! (`.txt` by default, matched case-sensitively) and its bytes decode as
//! UTF-8. Nothing else about the content is checked.

use std::fmt;

use crate::models::NewDocument;

/// Why an upload was rejected. Every variant is a client error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The multipart body has no `file` part.
    MissingFile,
    /// The filename is absent or does not end with the allowed extension.
    UnsupportedType { allowed_extension: String },
    /// The body could not be read or is not valid UTF-8.
    Unreadable(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile => write!(f, "No file part named 'file' in request"),
            Self::UnsupportedType { allowed_extension } => {
                write!(f, "Only {} files are supported", allowed_extension)
            }
            Self::Unreadable(reason) => write!(f, "Error reading file: {}", reason),
        }
    }
}

impl std::error::Error for UploadError {}

/// Checks the filename against the allowed extension.
pub fn validate_filename<'a>(
    filename: Option<&'a str>,
    allowed_extension: &str,
) -> Result<&'a str, UploadError> {
    match filename {
        Some(name) if name.ends_with(allowed_extension) => Ok(name),
        _ => Err(UploadError::UnsupportedType {
            allowed_extension: allowed_extension.to_string(),
        }),
    }
}

/// Decodes the uploaded bytes as UTF-8 text.
pub fn decode_text(bytes: Vec<u8>) -> Result<String, UploadError> {
    String::from_utf8(bytes).map_err(|e| UploadError::Unreadable(e.utf8_error().to_string()))
}

/// Validates a complete upload and produces the document to store.
pub fn prepare_document(
    filename: Option<&str>,
    bytes: Vec<u8>,
    allowed_extension: &str,
) -> Result<NewDocument, UploadError> {
    let name = validate_filename(filename, allowed_extension)?;
    let content = decode_text(bytes)?;
    Ok(NewDocument::new(name, content))
}
