//! Snapshot byte layout.
//!
//! ```text
//! [u32 LE msgpack length][LZ4 block of the msgpack envelope][SHA-256 of everything before]
//! ```

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::error::SaveError;
use super::SNAPSHOT_VERSION;

/// Length of the size header `lz4_flex` prepends.
const SIZE_HEADER_LEN: usize = 4;
const CHECKSUM_LEN: usize = 32;

/// A saved game: the registry-encoded state plus what is needed to tell
/// snapshots apart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub version: u32,
    /// Unix milliseconds.
    pub saved_at: u64,
    pub game_id: String,
    /// Output of [`Registry::encode`](crate::serialization::Registry::encode),
    /// type markers included.
    pub state: serde_json::Value,
}

impl Snapshot {
    pub fn new(game_id: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: unix_millis(),
            game_id: game_id.into(),
            state,
        }
    }

    /// A snapshot names its game and carries an encoded object.
    pub fn check_shape(&self) -> Result<(), SaveError> {
        if self.game_id.is_empty() || !self.state.is_object() {
            return Err(SaveError::Corrupted);
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SaveError> {
        self.check_shape()?;

        let packed = rmp_serde::to_vec_named(self)?;
        let mut bytes = compress_prepend_size(&packed);
        let digest = sha256(&bytes);
        bytes.extend_from_slice(&digest);
        Ok(bytes)
    }

    /// Rejects truncated input, a digest mismatch and snapshots written by a
    /// newer format before looking at the state.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SaveError> {
        if bytes.len() < SIZE_HEADER_LEN + CHECKSUM_LEN {
            return Err(SaveError::Corrupted);
        }

        let (body, digest) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
        if sha256(body)[..] != *digest {
            return Err(SaveError::ChecksumMismatch);
        }

        let packed = decompress_size_prepended(body).map_err(|_| SaveError::Decompression)?;
        let snapshot: Snapshot = rmp_serde::from_slice(&packed)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(SaveError::VersionMismatch {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        snapshot.check_shape()?;
        Ok(snapshot)
    }
}

fn sha256(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    Sha256::digest(bytes).into()
}

pub fn unix_millis() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        Snapshot::new("game-1", json!({"Game": true, "day": 3, "ratio": 0.25, "names": ["a", "b"]}))
    }

    #[test]
    fn test_bytes_roundtrip() {
        let snapshot = snapshot();
        let bytes = snapshot.to_bytes().unwrap();
        assert_eq!(Snapshot::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_tampered_trailer_fails_checksum() {
        let mut bytes = snapshot().to_bytes().unwrap();
        if let Some(last) = bytes.last_mut() {
            *last ^= 0xff;
        }
        assert!(matches!(Snapshot::from_bytes(&bytes), Err(SaveError::ChecksumMismatch)));
    }

    #[test]
    fn test_truncated_data_is_corrupted() {
        assert!(matches!(Snapshot::from_bytes(&[0; 10]), Err(SaveError::Corrupted)));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let mut snapshot = snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;
        let bytes = snapshot.to_bytes().unwrap();

        let result = Snapshot::from_bytes(&bytes);
        assert!(matches!(
            result,
            Err(SaveError::VersionMismatch { found, expected })
                if found == SNAPSHOT_VERSION + 1 && expected == SNAPSHOT_VERSION
        ));
        assert!(result.unwrap_err().is_recoverable());
    }

    #[test]
    fn test_snapshot_without_state_is_rejected() {
        let snapshot = Snapshot::new("game-1", json!(null));
        assert!(matches!(snapshot.to_bytes(), Err(SaveError::Corrupted)));
    }
}
