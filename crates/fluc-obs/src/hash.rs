use fluc_core::FlucError;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::serde::to_canonical_json_bytes;

/// Provenance hash of a toy study: SHA-256 over its canonical JSON, so two
/// runs share a hash exactly when every generator, analysis and binning
/// setting agrees.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, FlucError> {
    let digest = Sha256::digest(to_canonical_json_bytes(value)?);
    Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
}
