//! Save/load persistence with versioned envelopes
//!
//! Features:
//! - Versioned JSON envelope
//! - Write-to-temp then rename on native storage (see `platform`)
//! - Corruption surfaces as an error; callers fall back to defaults

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing saved data.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("storage unavailable")]
    Unavailable,
}

/// On-disk wrapper around any saved payload
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    payload: T,
}

/// Encode a payload into a versioned JSON envelope.
pub fn encode<T: Serialize>(payload: &T, version: u32) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&Envelope { version, payload })?)
}

/// Decode a versioned JSON envelope, rejecting other versions.
pub fn decode<T: DeserializeOwned>(json: &str, version: u32) -> Result<T, PersistenceError> {
    let envelope: Envelope<T> = serde_json::from_str(json)?;
    if envelope.version != version {
        return Err(PersistenceError::UnsupportedVersion {
            found: envelope.version,
            expected: version,
        });
    }
    Ok(envelope.payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_keeps_payload() {
        let json = encode(&42u64, 1).unwrap();
        assert!(json.contains("\"version\":1"));
        assert_eq!(decode::<u64>(&json, 1).unwrap(), 42);
    }

    #[test]
    fn test_rejects_other_version() {
        let json = encode(&7u64, 2).unwrap();
        let err = decode::<u64>(&json, 1).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion { found: 2, expected: 1 }
        ));
    }

    #[test]
    fn test_corrupt_json_is_an_error() {
        assert!(matches!(
            decode::<u64>("{not json", 1),
            Err(PersistenceError::Json(_))
        ));
        assert!(decode::<u64>("{\"version\":1,\"payload\":\"x\"}", 1).is_err());
    }
}
