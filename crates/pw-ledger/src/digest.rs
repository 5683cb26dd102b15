// digest.rs - Content digests for generated documents and chain links.
//
// A document digest pins the bytes the renderer wrote so a later download
// can be checked against its generation record. Chain links hash the raw
// ledger line, never a re-serialized record.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::LedgerError;

fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// SHA-256 of a generated document, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentDigest(String);

impl DocumentDigest {
    pub fn of_bytes(document: &[u8]) -> Self {
        Self(sha256_hex(document))
    }

    /// Digest of a document already on disk.
    pub fn of_document(path: &Path) -> Result<Self, LedgerError> {
        let bytes = std::fs::read(path).map_err(|source| LedgerError::DocumentUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::of_bytes(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `previous_hash` the next record must carry after `line`.
pub(crate) fn chain_link(line: &str) -> String {
    sha256_hex(line.as_bytes())
}
