// renderer.rs - Encode a document tree and persist it atomically.
//
// Bytes go to a hidden temp file inside the output directory, are synced,
// then promoted with a no-clobber rename. Readers never observe a partial
// document, and an existing document is never overwritten.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pw_policy::DocumentTree;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::config::RenderConfig;
use crate::docx;
use crate::error::RenderError;
use crate::filename::{validate_filename, ArtifactName, MAX_VERSIONS};

/// Prefix for in-flight temp files. Never matches a valid download name.
pub const PARTIAL_PREFIX: &str = ".pw-partial-";

/// Outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Encode `tree` and write it under a freshly derived name.
    pub fn render(&self, tree: &DocumentTree, org_key: &str) -> Result<GenerationResult, RenderError> {
        let bytes = docx::encode(tree)?;
        let generated_at = tree.metadata.generated_at;
        let name = ArtifactName::derive(org_key, &tree.metadata.organization, generated_at);

        let dir = self.output_dir();
        fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let staged = self.stage(&bytes)?;
        let (filename, path) = promote(staged, dir, &name)?;

        tracing::debug!(file = %filename, bytes = bytes.len(), "document written");
        Ok(GenerationResult {
            filename,
            path,
            size_bytes: bytes.len() as u64,
            generated_at,
        })
    }

    /// Resolve a download name to a document in the output directory.
    pub fn locate(&self, filename: &str) -> Result<PathBuf, RenderError> {
        validate_filename(filename)?;
        let path = self.output_dir().join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(RenderError::NotFound { path })
        }
    }

    fn stage(&self, bytes: &[u8]) -> Result<NamedTempFile, RenderError> {
        let dir = self.output_dir();
        let write_err = |source: std::io::Error| RenderError::Write {
            path: dir.to_path_buf(),
            source,
        };
        let mut staged = tempfile::Builder::new()
            .prefix(PARTIAL_PREFIX)
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(write_err)?;
        staged.write_all(bytes).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;
        Ok(staged)
    }
}

/// Rename the staged file to the first free versioned name.
///
/// The temp file is removed when `staged` drops on any error path.
fn promote(mut staged: NamedTempFile, dir: &Path, name: &ArtifactName) -> Result<(String, PathBuf), RenderError> {
    for n in 1..=MAX_VERSIONS {
        let filename = name.versioned(n);
        let path = dir.join(&filename);
        match staged.persist_noclobber(&path) {
            Ok(_) => return Ok((filename, path)),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!(file = %filename, "name taken, trying next version");
                staged = e.file;
            }
            Err(e) => {
                tracing::error!(file = %filename, error = %e.error, "failed to promote document");
                return Err(RenderError::Write { path, source: e.error });
            }
        }
    }
    tracing::error!(base = %name.stem(), attempts = MAX_VERSIONS, "all versioned names taken");
    Err(RenderError::NameExhausted {
        base: name.stem().to_string(),
        attempts: MAX_VERSIONS,
    })
}
