use thiserror::Error;

use crate::serialization::{DecodeError, EncodeError};

/// Failure to store or restore a game.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Snapshot storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Can't pack snapshot: {0}")]
    Pack(#[from] rmp_serde::encode::Error),

    #[error("Can't unpack snapshot: {0}")]
    Unpack(#[from] rmp_serde::decode::Error),

    #[error("Can't encode game state: {0}")]
    Encode(#[from] EncodeError),

    #[error("Can't rebuild game state: {0}")]
    Decode(#[from] DecodeError),

    #[error("Snapshot payload is not valid LZ4")]
    Decompression,

    #[error("Snapshot is truncated or malformed")]
    Corrupted,

    #[error("Snapshot format {found} is newer than supported {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Snapshot checksum doesn't match its contents")]
    ChecksumMismatch,

    #[error("No saved game with id {game_id}")]
    NotFound { game_id: String },

    #[error("'{game_id}' can't be used as a game id")]
    InvalidGameId { game_id: String },
}

impl SaveError {
    /// Whether the snapshot itself is still intact.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SaveError::Io(_) | SaveError::NotFound { .. } | SaveError::VersionMismatch { .. }
        )
    }
}
