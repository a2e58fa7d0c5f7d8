//! Identifier newtypes for data rooms, folders and files
//!
//! Identifiers are supplied by callers. The engine never generates them; the
//! `generate()` constructors exist for front ends that need fresh ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Rejection raised when an identifier is constructed from blank input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdError {
    kind: &'static str,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} id cannot be empty or whitespace-only", self.kind)
    }
}

impl std::error::Error for IdError {}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, rejecting empty or whitespace-only input
            pub fn try_new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(IdError { kind: $kind });
                }
                Ok(Self(value))
            }

            /// Generate a fresh time-ordered identifier (UUIDv7)
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Get the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a data room
    DataRoomId,
    "data room"
);

string_id!(
    /// Identifier of a folder (including a data room's root folder)
    FolderId,
    "folder"
);

string_id!(
    /// Identifier of a file; also the key of the file's blob in blob storage
    FileId,
    "file"
);

/// Any node that can appear in a folder tree: the unit of selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NodeId {
    Folder(FolderId),
    File(FileId),
}

impl NodeId {
    pub fn as_folder(&self) -> Option<&FolderId> {
        match self {
            NodeId::Folder(id) => Some(id),
            NodeId::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileId> {
        match self {
            NodeId::File(id) => Some(id),
            NodeId::Folder(_) => None,
        }
    }
}

impl From<FolderId> for NodeId {
    fn from(id: FolderId) -> Self {
        NodeId::Folder(id)
    }
}

impl From<FileId> for NodeId {
    fn from(id: FileId) -> Self {
        NodeId::File(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Folder(id) => write!(f, "folder:{}", id),
            NodeId::File(id) => write!(f, "file:{}", id),
        }
    }
}

/// Parses the `folder:<id>` / `file:<id>` form produced by `Display`
impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("folder", id)) => FolderId::try_new(id).map(NodeId::Folder),
            Some(("file", id)) => FileId::try_new(id).map(NodeId::File),
            _ => Err(IdError { kind: "node" }),
        }
    }
}
