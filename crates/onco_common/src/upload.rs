//! Image upload constraints and data URI handling.
//!
//! The form layer accepts one JPEG or PNG of at most 5 MB, turns it into a
//! `data:<mime>;base64,<payload>` URI and hands that to the service.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

/// Largest accepted image, in bytes
pub const MAX_FILE_SIZE: usize = 5_000_000;

pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

pub const CANCER_TYPES: &[&str] = &["Oral Cancer", "Cervical Cancer"];

pub const IMAGE_TYPES: &[&str] = &[
    "Clinical",
    "Clinical and Radiograph",
    "Histopathology",
    "Radiograph",
];

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Image is required.")]
    Empty,

    #[error("Max file size is 5MB (got {0} bytes).")]
    TooLarge(usize),

    #[error(".jpg, .jpeg, and .png files are accepted (got {0}).")]
    UnsupportedType(String),

    #[error("Invalid image data URI: {0}")]
    InvalidDataUri(&'static str),

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated image ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate raw bytes; `declared_mime` is only consulted when the
    /// content carries no recognisable signature
    pub fn from_bytes(bytes: Vec<u8>, declared_mime: Option<&str>) -> Result<Self, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge(bytes.len()));
        }

        let mime = match sniff_mime(&bytes) {
            Some(mime) => mime,
            None => declared_mime
                .and_then(canonical_mime)
                .ok_or_else(|| {
                    UploadError::UnsupportedType(declared_mime.unwrap_or("unknown").to_string())
                })?,
        };

        Ok(Self { mime, bytes })
    }

    /// Read and validate an image file; the extension stands in for the
    /// declared type
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let size = fs::metadata(path)?.len() as usize;
        if size > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge(size));
        }

        let declared = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!("image/{}", e.to_lowercase()));
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes, declared.as_deref())
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Borrowed view of a `data:<mime>;base64,<payload>` URI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime: &'a str,
    pub base64: &'a str,
}

impl<'a> DataUri<'a> {
    /// Size of the decoded payload, computed from the encoded length
    pub fn decoded_len(&self) -> usize {
        let padding = self.base64.bytes().rev().take_while(|&b| b == b'=').count();
        ((self.base64.len() / 4) * 3 + (self.base64.len() % 4) * 3 / 4).saturating_sub(padding.min(2))
    }
}

pub fn parse_data_uri(uri: &str) -> Result<DataUri<'_>, UploadError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or(UploadError::InvalidDataUri("missing 'data:' prefix"))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or(UploadError::InvalidDataUri("missing ';base64,' marker"))?;

    if mime.is_empty() {
        return Err(UploadError::InvalidDataUri("missing MIME type"));
    }
    if payload.is_empty() {
        return Err(UploadError::InvalidDataUri("empty payload"));
    }

    Ok(DataUri {
        mime,
        base64: payload,
    })
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(PNG_MAGIC) {
        Some("image/png")
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else {
        None
    }
}

/// Match a declared type against [`ACCEPTED_IMAGE_TYPES`]; `image/jpg` is
/// reported as `image/jpeg`
fn canonical_mime(declared: &str) -> Option<&'static str> {
    let declared = declared.trim().to_lowercase();
    let accepted = ACCEPTED_IMAGE_TYPES
        .iter()
        .copied()
        .find(|mime| *mime == declared)?;
    Some(if accepted == "image/jpg" { "image/jpeg" } else { accepted })
}
