use bytes::Bytes;

use crate::error::BilledError;

/// Receipt image formats a bill can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptKind {
    Png,
    Jpeg,
}

impl ReceiptKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ReceiptKind::Png => "image/png",
            ReceiptKind::Jpeg => "image/jpeg",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(ReceiptKind::Png),
            "image/jpeg" => Some(ReceiptKind::Jpeg),
            _ => None,
        }
    }
}

/// Guess a MIME type from a file name, the way a browser file picker does.
pub fn mime_type_for_name(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".txt") {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

/// A file picked by the user, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl ReceiptFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn kind(&self) -> Option<ReceiptKind> {
        ReceiptKind::from_mime(&self.mime_type)
    }
}

/// A receipt that passed type validation and is waiting for the form
/// to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedReceipt {
    file: ReceiptFile,
    kind: ReceiptKind,
}

impl StagedReceipt {
    pub fn file(&self) -> &ReceiptFile {
        &self.file
    }

    pub fn file_name(&self) -> &str {
        &self.file.name
    }

    pub fn kind(&self) -> ReceiptKind {
        self.kind
    }
}

impl TryFrom<ReceiptFile> for StagedReceipt {
    type Error = BilledError;

    fn try_from(file: ReceiptFile) -> Result<Self, Self::Error> {
        match file.kind() {
            Some(kind) => Ok(Self { file, kind }),
            None => Err(BilledError::UnsupportedFileType(file.mime_type)),
        }
    }
}
