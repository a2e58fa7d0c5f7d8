use dataroom_core_types::{DataRoomId, FileId, FolderId};
use thiserror::Error;

use crate::rules::naming::NameRejection;

/// Result type alias using DataRoomError
pub type Result<T> = std::result::Result<T, DataRoomError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that front ends can use to pick a
/// localized message without parsing display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    InvalidName,
    DuplicateName,
    NoChange,
    AlreadyExists,
    NotFound,

    // Structure
    CrossScope,
    RootProtected,
    CycleDetected,
    ConstraintViolation,

    // Collaborators
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::DuplicateName => "ERR_DUPLICATE_NAME",
            ExErrorKind::NoChange => "ERR_NO_CHANGE",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::CrossScope => "ERR_CROSS_SCOPE",
            ExErrorKind::RootProtected => "ERR_ROOT_PROTECTED",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional
/// operation and entity context for logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Rejection taxonomy for engine operations and state validation
///
/// Mutations never surface these to callers as failures of the call itself:
/// the public transition functions log the rejection and hand back the
/// unchanged state. The `try_*` forms and `validate_state` return them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataRoomError {
    // ===== Lookup Errors =====
    #[error("Data room not found: {data_room_id}")]
    DataRoomNotFound { data_room_id: DataRoomId },

    #[error("Folder not found: {folder_id}")]
    FolderNotFound { folder_id: FolderId },

    #[error("File not found: {file_id}")]
    FileNotFound { file_id: FileId },

    // ===== Naming Errors =====
    #[error("Invalid name: {reason}")]
    InvalidName { reason: NameRejection },

    #[error("A data room named '{name}' already exists")]
    DuplicateDataRoomName { name: String },

    #[error("A folder named '{name}' already exists in folder {parent_folder_id}")]
    DuplicateFolderName {
        parent_folder_id: FolderId,
        name: String,
    },

    #[error("A file named '{name}' already exists in folder {parent_folder_id}")]
    DuplicateFileName {
        parent_folder_id: FolderId,
        name: String,
    },

    #[error("Name of {entity_id} is unchanged")]
    NameUnchanged { entity_id: String },

    // ===== Identity Errors =====
    #[error("Identifier already in use: {entity_id}")]
    IdAlreadyExists { entity_id: String },

    // ===== Structural Errors =====
    #[error("Folder {folder_id} belongs to data room {actual}, expected {expected}")]
    CrossRoom {
        folder_id: FolderId,
        expected: DataRoomId,
        actual: DataRoomId,
    },

    #[error("Root folder {folder_id} cannot be moved or deleted")]
    RootFolderImmutable { folder_id: FolderId },

    #[error("Folder {folder_id} cannot be moved into itself")]
    MoveIntoSelf { folder_id: FolderId },

    #[error("Folder {folder_id} cannot be moved into its descendant {destination_folder_id}")]
    MoveIntoDescendant {
        folder_id: FolderId,
        destination_folder_id: FolderId,
    },

    #[error("{entity_id} is already in folder {destination_folder_id}")]
    AlreadyInDestination {
        entity_id: String,
        destination_folder_id: FolderId,
    },

    // ===== Invariant Violations =====
    #[error("Data room {data_room_id} root folder {root_folder_id} is missing or not a root")]
    InvalidRootFolder {
        data_room_id: DataRoomId,
        root_folder_id: FolderId,
    },

    #[error("Data room order is inconsistent with stored rooms at {data_room_id}")]
    DataRoomOrderMismatch { data_room_id: DataRoomId },

    #[error("Folder {folder_id} is a second root in data room {data_room_id}")]
    ExtraRootFolder {
        folder_id: FolderId,
        data_room_id: DataRoomId,
    },

    #[error("Folder {folder_id} references unknown data room {data_room_id}")]
    FolderInUnknownRoom {
        folder_id: FolderId,
        data_room_id: DataRoomId,
    },

    #[error("Orphaned folder {folder_id}: parent {parent_folder_id} does not exist")]
    OrphanedFolder {
        folder_id: FolderId,
        parent_folder_id: FolderId,
    },

    #[error("Orphaned file {file_id}: parent {parent_folder_id} does not exist")]
    OrphanedFile {
        file_id: FileId,
        parent_folder_id: FolderId,
    },

    #[error("Folder {folder_id} child list disagrees with parent pointer of {child_id}")]
    ChildListMismatch { folder_id: FolderId, child_id: String },

    #[error("Folder {folder_id} lists {child_id} more than once")]
    DuplicateChildReference { folder_id: FolderId, child_id: String },

    #[error("Folder {folder_id} has duplicate sibling name '{name}'")]
    DuplicateSiblingName { folder_id: FolderId, name: String },

    #[error("Cycle detected in parent chain of folder {folder_id}")]
    CycleDetected { folder_id: FolderId },

    #[error("Unsupported schema version {found} (expected {expected})")]
    SchemaVersionMismatch { found: u32, expected: u32 },
}

impl DataRoomError {
    pub fn kind(&self) -> ExErrorKind {
        match self {
            DataRoomError::DataRoomNotFound { .. }
            | DataRoomError::FolderNotFound { .. }
            | DataRoomError::FileNotFound { .. } => ExErrorKind::NotFound,
            DataRoomError::InvalidName { .. } => ExErrorKind::InvalidName,
            DataRoomError::DuplicateDataRoomName { .. }
            | DataRoomError::DuplicateFolderName { .. }
            | DataRoomError::DuplicateFileName { .. } => ExErrorKind::DuplicateName,
            DataRoomError::NameUnchanged { .. } | DataRoomError::AlreadyInDestination { .. } => {
                ExErrorKind::NoChange
            }
            DataRoomError::IdAlreadyExists { .. } => ExErrorKind::AlreadyExists,
            DataRoomError::CrossRoom { .. } => ExErrorKind::CrossScope,
            DataRoomError::RootFolderImmutable { .. } => ExErrorKind::RootProtected,
            DataRoomError::MoveIntoSelf { .. }
            | DataRoomError::MoveIntoDescendant { .. }
            | DataRoomError::CycleDetected { .. } => ExErrorKind::CycleDetected,
            DataRoomError::SchemaVersionMismatch { .. } => ExErrorKind::Persistence,
            DataRoomError::InvalidRootFolder { .. }
            | DataRoomError::DataRoomOrderMismatch { .. }
            | DataRoomError::ExtraRootFolder { .. }
            | DataRoomError::FolderInUnknownRoom { .. }
            | DataRoomError::OrphanedFolder { .. }
            | DataRoomError::OrphanedFile { .. }
            | DataRoomError::ChildListMismatch { .. }
            | DataRoomError::DuplicateChildReference { .. }
            | DataRoomError::DuplicateSiblingName { .. } => ExErrorKind::ConstraintViolation,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// The identifier of the entity the rejection is about, if there is one
    pub fn entity_id(&self) -> Option<String> {
        match self {
            DataRoomError::DataRoomNotFound { data_room_id }
            | DataRoomError::InvalidRootFolder { data_room_id, .. }
            | DataRoomError::DataRoomOrderMismatch { data_room_id } => {
                Some(data_room_id.to_string())
            }
            DataRoomError::FolderNotFound { folder_id }
            | DataRoomError::CrossRoom { folder_id, .. }
            | DataRoomError::RootFolderImmutable { folder_id }
            | DataRoomError::MoveIntoSelf { folder_id }
            | DataRoomError::MoveIntoDescendant { folder_id, .. }
            | DataRoomError::ExtraRootFolder { folder_id, .. }
            | DataRoomError::FolderInUnknownRoom { folder_id, .. }
            | DataRoomError::OrphanedFolder { folder_id, .. }
            | DataRoomError::ChildListMismatch { folder_id, .. }
            | DataRoomError::DuplicateChildReference { folder_id, .. }
            | DataRoomError::DuplicateSiblingName { folder_id, .. }
            | DataRoomError::CycleDetected { folder_id } => Some(folder_id.to_string()),
            DataRoomError::FileNotFound { file_id } | DataRoomError::OrphanedFile { file_id, .. } => {
                Some(file_id.to_string())
            }
            DataRoomError::DuplicateFolderName {
                parent_folder_id, ..
            }
            | DataRoomError::DuplicateFileName {
                parent_folder_id, ..
            } => Some(parent_folder_id.to_string()),
            DataRoomError::NameUnchanged { entity_id }
            | DataRoomError::IdAlreadyExists { entity_id }
            | DataRoomError::AlreadyInDestination { entity_id, .. } => Some(entity_id.clone()),
            DataRoomError::InvalidName { .. }
            | DataRoomError::DuplicateDataRoomName { .. }
            | DataRoomError::SchemaVersionMismatch { .. } => None,
        }
    }
}

impl From<DataRoomError> for ExError {
    fn from(err: DataRoomError) -> Self {
        let ex = ExError::new(err.kind()).with_message(err.to_string());
        match err.entity_id() {
            Some(id) => ex.with_entity_id(id),
            None => ex,
        }
    }
}

impl From<&DataRoomError> for ExError {
    fn from(err: &DataRoomError) -> Self {
        err.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str) -> FolderId {
        FolderId::try_new(id).unwrap()
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ExErrorKind::DuplicateName.code(), "ERR_DUPLICATE_NAME");
        assert_eq!(ExErrorKind::RootProtected.code(), "ERR_ROOT_PROTECTED");
    }

    #[test]
    fn test_conversion_carries_kind_and_entity() {
        let err = DataRoomError::RootFolderImmutable {
            folder_id: folder("root"),
        };
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::RootProtected);
        assert_eq!(ex.entity_id(), Some("root"));
        assert!(ex.message().contains("cannot be moved or deleted"));
    }

    #[test]
    fn test_invalid_name_has_no_entity() {
        let err = DataRoomError::InvalidName {
            reason: NameRejection::Reserved,
        };
        assert_eq!(err.code(), "ERR_INVALID_NAME");
        assert!(err.entity_id().is_none());
    }

    #[test]
    fn test_display_includes_op() {
        let ex = ExError::new(ExErrorKind::NotFound)
            .with_op("move_folder")
            .with_message("Folder not found");
        assert_eq!(
            ex.to_string(),
            "[ERR_NOT_FOUND] in operation 'move_folder': Folder not found"
        );
    }
}
