// ledger.rs - Append-only JSONL ledger of generated documents.
//
// One JSON record per line. Each record carries the SHA-256 of the raw
// line before it, so inserting, dropping or editing a line breaks the
// chain and `verify_chain` reports where.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::LedgerError;
use crate::digest::{chain_link, DocumentDigest};
use crate::record::GenerationRecord;

pub struct GenerationLedger {
    writer: BufWriter<File>,
    path: PathBuf,
    last_hash: Option<String>,
}

impl GenerationLedger {
    /// Open (or create) the ledger, recovering the chain head from existing lines.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let open_failed = |source: std::io::Error| LedgerError::LedgerUnavailable {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_failed)?;
        }

        let last_hash = if path.exists() {
            read_last_hash(&path)?
        } else {
            None
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(open_failed)?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            last_hash,
        })
    }

    /// Link `record` to the chain head and append it. Flushes before returning.
    pub fn append(&mut self, record: &mut GenerationRecord) -> Result<(), LedgerError> {
        record.previous_hash = self.last_hash.clone();
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        self.last_hash = Some(chain_link(&json));
        tracing::debug!(record = %record.record_id, file = %record.filename, "ledger record appended");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, oldest first. A ledger that does not exist yet is empty.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<GenerationRecord>, LedgerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for (idx, line) in lines(path)?.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_record(idx + 1, &line)?);
        }
        Ok(records)
    }

    /// The newest `n` records, oldest first.
    pub fn tail(path: impl AsRef<Path>, n: usize) -> Result<Vec<GenerationRecord>, LedgerError> {
        let mut records = Self::read_all(path)?;
        let skip = records.len().saturating_sub(n);
        Ok(records.split_off(skip))
    }

    /// Most recent record for a document filename.
    pub fn find_by_filename(
        path: impl AsRef<Path>,
        filename: &str,
    ) -> Result<Option<GenerationRecord>, LedgerError> {
        Ok(Self::read_all(path)?
            .into_iter()
            .rev()
            .find(|r| r.filename == filename))
    }

    /// Check every link in the chain. Returns the number of records verified.
    pub fn verify_chain(path: impl AsRef<Path>) -> Result<usize, LedgerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(0);
        }
        let mut previous_hash: Option<String> = None;
        let mut verified = 0;

        for (idx, line) in lines(path)?.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = parse_record(idx + 1, &line)?;
            if record.previous_hash != previous_hash {
                tracing::error!(
                    line = idx + 1,
                    record = %record.record_id,
                    file = %record.filename,
                    path = %path.display(),
                    "ledger chain broken"
                );
                return Err(LedgerError::ChainBroken {
                    line: idx + 1,
                    filename: record.filename,
                    expected: previous_hash.unwrap_or_else(|| "None".to_string()),
                    actual: record.previous_hash.unwrap_or_else(|| "None".to_string()),
                });
            }
            // Hash the raw line; re-serializing could reorder fields.
            previous_hash = Some(chain_link(&line));
            verified += 1;
        }
        Ok(verified)
    }
}

fn lines(path: &Path) -> Result<std::io::Lines<BufReader<File>>, LedgerError> {
    let file = File::open(path).map_err(|source| LedgerError::LedgerUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file).lines())
}

fn parse_record(line: usize, raw: &str) -> Result<GenerationRecord, LedgerError> {
    serde_json::from_str(raw).map_err(|source| LedgerError::MalformedRecord { line, source })
}

fn read_last_hash(path: &Path) -> Result<Option<String>, LedgerError> {
    let mut last_line: Option<String> = None;
    for line in lines(path)? {
        let line = line?;
        if !line.trim().is_empty() {
            last_line = Some(line);
        }
    }
    Ok(last_line.map(|line| chain_link(&line)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn record(filename: &str) -> GenerationRecord {
        GenerationRecord::new(
            "acme",
            "Acme Co",
            "acceptable_use",
            filename,
            format!("/srv/out/{}", filename),
            DocumentDigest::of_bytes(filename.as_bytes()),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn first_record_has_no_previous_hash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        GenerationLedger::open(&path).unwrap().append(&mut record("a.docx")).unwrap();
        let records = GenerationLedger::read_all(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].previous_hash.is_none());
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".pw").join("generations.jsonl");
        let ledger = GenerationLedger::open(&path).unwrap();
        assert_eq!(ledger.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn reopen_continues_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        GenerationLedger::open(&path).unwrap().append(&mut record("a.docx")).unwrap();
        GenerationLedger::open(&path).unwrap().append(&mut record("b.docx")).unwrap();
        assert_eq!(GenerationLedger::verify_chain(&path).unwrap(), 2);
    }

    #[test]
    fn edited_line_breaks_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        {
            let mut ledger = GenerationLedger::open(&path).unwrap();
            for name in ["a.docx", "b.docx", "c.docx"] {
                ledger.append(&mut record(name)).unwrap();
            }
        }
        let tampered = fs::read_to_string(&path).unwrap().replacen("Acme Co", "Evil Co", 1);
        fs::write(&path, tampered).unwrap();

        match GenerationLedger::verify_chain(&path).unwrap_err() {
            LedgerError::ChainBroken { line, filename, .. } => {
                assert_eq!(line, 2);
                assert_eq!(filename, "b.docx");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn tail_and_find() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        {
            let mut ledger = GenerationLedger::open(&path).unwrap();
            for name in ["a.docx", "b.docx", "c.docx"] {
                ledger.append(&mut record(name)).unwrap();
            }
        }
        let last_two: Vec<String> = GenerationLedger::tail(&path, 2)
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(last_two, vec!["b.docx", "c.docx"]);
        assert_eq!(GenerationLedger::tail(&path, 10).unwrap().len(), 3);

        let found = GenerationLedger::find_by_filename(&path, "b.docx").unwrap().unwrap();
        assert_eq!(found.document_path, PathBuf::from("/srv/out/b.docx"));
        assert!(GenerationLedger::find_by_filename(&path, "zzz.docx").unwrap().is_none());
    }

    #[test]
    fn garbled_line_reports_its_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        GenerationLedger::open(&path).unwrap().append(&mut record("a.docx")).unwrap();
        let mut raw = fs::read_to_string(&path).unwrap();
        raw.push_str("{not json\n");
        fs::write(&path, raw).unwrap();

        match GenerationLedger::read_all(&path).unwrap_err() {
            LedgerError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!(
            GenerationLedger::verify_chain(&path).unwrap_err(),
            LedgerError::MalformedRecord { line: 2, .. }
        ));
    }

    #[test]
    fn missing_ledger_reads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("none.jsonl");
        assert!(GenerationLedger::read_all(&path).unwrap().is_empty());
        assert_eq!(GenerationLedger::verify_chain(&path).unwrap(), 0);
    }
}
