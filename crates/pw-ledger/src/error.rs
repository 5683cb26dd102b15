// error.rs - What can go wrong recording or checking a generated document.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cannot open generation ledger {}: {source}", path.display())]
    LedgerUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append generation record: {0}")]
    AppendFailed(#[from] std::io::Error),

    #[error("failed to encode generation record: {0}")]
    RecordEncoding(#[from] serde_json::Error),

    /// `line` is 1-based.
    #[error("generation record at line {line} is malformed: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record's `previous_hash` does not match the line before it.
    #[error("ledger chain broken at line {line} (record for {filename}): expected previous hash {expected}, found {actual}")]
    ChainBroken {
        line: usize,
        filename: String,
        expected: String,
        actual: String,
    },

    #[error("cannot read generated document {}: {source}", path.display())]
    DocumentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file on disk differs from what was recorded at generation time.
    #[error("{filename} was modified after generation: recorded {recorded}, found {actual}")]
    DocumentModified {
        filename: String,
        recorded: String,
        actual: String,
    },
}
