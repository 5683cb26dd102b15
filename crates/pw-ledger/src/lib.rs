//! # pw-ledger
//!
//! Append-only record of every generated policy document.
//!
//! Each [`GenerationRecord`] is one line in a JSONL file and carries the
//! SHA-256 of the line before it. [`GenerationLedger::verify_chain`]
//! detects any edit, insertion or deletion after the fact.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pw_ledger::{DocumentDigest, GenerationLedger, GenerationRecord};
//!
//! let path = Path::new("generated_policies/Acme_Co.docx");
//! let mut ledger = GenerationLedger::open(".pw/generations.jsonl").unwrap();
//! let mut record = GenerationRecord::new(
//!     "acme", "Acme Co", "acceptable_use", "Acme_Co.docx",
//!     path, DocumentDigest::of_document(path).unwrap(), chrono::Utc::now(),
//! );
//! ledger.append(&mut record).unwrap();
//! record.check_document(path).unwrap();
//! ```

pub mod digest;
pub mod error;
pub mod ledger;
pub mod record;

pub use digest::DocumentDigest;
pub use error::LedgerError;
pub use ledger::GenerationLedger;
pub use record::GenerationRecord;
