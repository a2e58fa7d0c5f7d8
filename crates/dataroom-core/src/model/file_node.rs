use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dataroom_core_types::{FileId, FolderId};

/// Content kind of a stored document
///
/// Data rooms hold PDF documents only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MimeType {
    #[default]
    #[serde(rename = "application/pdf")]
    Pdf,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Pdf => "application/pdf",
        }
    }
}

/// FileNode - a document placed in a folder
///
/// The engine tracks only metadata; the bytes live in blob storage keyed by
/// the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: FileId,
    pub parent_folder_id: FolderId,
    pub name: String,
    pub mime_type: MimeType,

    /// Size in bytes, informational only
    pub size: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileNode {
    pub fn new(
        id: FileId,
        parent_folder_id: FolderId,
        name: String,
        size: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            parent_folder_id,
            name,
            mime_type: MimeType::default(),
            size,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_serializes_as_media_type() {
        let json = serde_json::to_string(&MimeType::Pdf).unwrap();
        assert_eq!(json, "\"application/pdf\"");
        assert_eq!(MimeType::Pdf.as_str(), "application/pdf");
    }
}
