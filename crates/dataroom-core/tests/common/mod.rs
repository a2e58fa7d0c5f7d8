use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use dataroom_core::ops;
use dataroom_core::seed::{seeded_state, SEED_DATA_ROOM_ID, SEED_ROOT_FOLDER_ID};
use dataroom_core::{AggregateState, DataRoomId, FileId, FolderId};

#[allow(dead_code)]
pub fn folder_id(id: &str) -> FolderId {
    FolderId::try_new(id).unwrap()
}

#[allow(dead_code)]
pub fn file_id(id: &str) -> FileId {
    FileId::try_new(id).unwrap()
}

#[allow(dead_code)]
pub fn room_id(id: &str) -> DataRoomId {
    DataRoomId::try_new(id).unwrap()
}

/// Fixed clock start so timestamps are reproducible
#[allow(dead_code)]
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// Seeded state plus helpers that build trees through the real operations
///
/// Every helper panics if the operation was a no-op, so fixtures cannot
/// silently diverge from what a test expects.
#[allow(dead_code)]
pub struct Fixture {
    pub state: Arc<AggregateState>,
    pub room: DataRoomId,
    pub root: FolderId,
    tick: i64,
}

#[allow(dead_code)]
impl Fixture {
    pub fn seeded() -> Self {
        Self {
            state: Arc::new(seeded_state(epoch())),
            room: room_id(SEED_DATA_ROOM_ID),
            root: folder_id(SEED_ROOT_FOLDER_ID),
            tick: 0,
        }
    }

    /// Strictly increasing timestamps, one second apart
    pub fn now(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        epoch() + Duration::seconds(self.tick)
    }

    pub fn folder(&mut self, parent: &str, id: &str, name: &str) -> &mut Self {
        let now = self.now();
        let parent = if parent == "root" {
            self.root.clone()
        } else {
            folder_id(parent)
        };
        let next = ops::create_folder(&self.state, &self.room, &parent, &folder_id(id), name, now);
        assert!(!ops::is_noop(&self.state, &next), "fixture folder {} rejected", id);
        self.state = next;
        self
    }

    pub fn file(&mut self, parent: &str, id: &str, name: &str, size: u64) -> &mut Self {
        let now = self.now();
        let parent = if parent == "root" {
            self.root.clone()
        } else {
            folder_id(parent)
        };
        let next = ops::create_file(&self.state, &parent, &file_id(id), name, size, now);
        assert!(!ops::is_noop(&self.state, &next), "fixture file {} rejected", id);
        self.state = next;
        self
    }

    /// root/A/A1 with one file in A and one in A1
    pub fn nested() -> Self {
        let mut fixture = Self::seeded();
        fixture
            .folder("root", "a", "A")
            .folder("a", "a1", "A1")
            .file("a", "fa", "a.pdf", 100)
            .file("a1", "fa1", "a1.pdf", 200);
        fixture
    }
}
