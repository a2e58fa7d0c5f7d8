//! Selection engine
//!
//! Selection is stored sparsely: a node either carries an explicit include or
//! exclude mark, or inherits the mark of its nearest marked ancestor folder.
//! [`SelectionMarks`] owns the marks and is edited by toggles;
//! [`SelectionSnapshot`] answers read queries (tri-state mode, checked set,
//! delete summary) against one state and one set of marks, memoizing per
//! folder for the lifetime of the snapshot.

pub mod marks;
pub mod snapshot;

pub use marks::{Mark, SelectionMarks};
pub use snapshot::{CheckedSet, SelectionMode, SelectionSnapshot, SelectionSummary};
