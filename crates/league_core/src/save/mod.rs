// Snapshot persistence
// Registry-encoded game state, MessagePack + LZ4 with a SHA-256 trailer

pub mod error;
pub mod format;
pub mod repository;

pub use error::SaveError;
pub use format::{unix_millis, Snapshot};
pub use repository::{DirectoryStore, GameRepository, MemoryStore, SnapshotStore};

pub const SNAPSHOT_VERSION: u32 = 1;
