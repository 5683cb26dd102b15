// record.rs - One ledger line per generated document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::digest::DocumentDigest;
use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub record_id: Uuid,
    pub org_key: String,
    pub company_name: String,
    /// e.g. "acceptable_use".
    pub policy_type: String,
    pub filename: String,
    pub document_path: PathBuf,
    pub document_sha256: DocumentDigest,
    /// When the document was generated; drives its filename.
    pub generated_at: DateTime<Utc>,
    /// When this record was appended.
    pub recorded_at: DateTime<Utc>,
    /// SHA-256 of the previous raw line. None for the first record.
    pub previous_hash: Option<String>,
}

impl GenerationRecord {
    pub fn new(
        org_key: impl Into<String>,
        company_name: impl Into<String>,
        policy_type: impl Into<String>,
        filename: impl Into<String>,
        document_path: impl Into<PathBuf>,
        document_sha256: DocumentDigest,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            org_key: org_key.into(),
            company_name: company_name.into(),
            policy_type: policy_type.into(),
            filename: filename.into(),
            document_path: document_path.into(),
            document_sha256,
            generated_at,
            recorded_at: Utc::now(),
            previous_hash: None,
        }
    }

    /// Fails with `DocumentModified` when the file at `path` is not the
    /// document this record describes.
    pub fn check_document(&self, path: &Path) -> Result<(), LedgerError> {
        let actual = DocumentDigest::of_document(path)?;
        if actual == self.document_sha256 {
            return Ok(());
        }
        tracing::warn!(
            record = %self.record_id,
            file = %self.filename,
            recorded = %self.document_sha256,
            actual = %actual,
            "generated document differs from its record"
        );
        Err(LedgerError::DocumentModified {
            filename: self.filename.clone(),
            recorded: self.document_sha256.to_string(),
            actual: actual.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_for(path: &Path, bytes: &[u8]) -> GenerationRecord {
        GenerationRecord::new(
            "acme",
            "Acme Co",
            "acceptable_use",
            "Acme_Co.docx",
            path,
            DocumentDigest::of_bytes(bytes),
            Utc::now(),
        )
    }

    #[test]
    fn untouched_document_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Acme_Co.docx");
        std::fs::write(&path, b"original").unwrap();
        assert!(record_for(&path, b"original").check_document(&path).is_ok());
    }

    #[test]
    fn edited_document_is_reported_with_both_digests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Acme_Co.docx");
        std::fs::write(&path, b"edited").unwrap();
        let record = record_for(&path, b"original");

        match record.check_document(&path).unwrap_err() {
            LedgerError::DocumentModified { filename, recorded, actual } => {
                assert_eq!(filename, "Acme_Co.docx");
                assert_eq!(recorded, DocumentDigest::of_bytes(b"original").to_string());
                assert_eq!(actual, DocumentDigest::of_bytes(b"edited").to_string());
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_document_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.docx");
        let err = record_for(&path, b"x").check_document(&path).unwrap_err();
        assert!(matches!(err, LedgerError::DocumentUnreadable { .. }));
    }
}
