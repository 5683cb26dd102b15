// error.rs - Error types for rendering and storing policy documents.

use std::path::PathBuf;

use pw_policy::{ErrorKind, PolicyError};
use thiserror::Error;

/// Errors raised while encoding or persisting a document artifact.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing, syncing or promoting the artifact failed.
    #[error("failed to write document {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zip container could not be assembled.
    #[error("failed to build document container: {0}")]
    Container(#[from] zip::result::ZipError),

    /// Every versioned name for this artifact is already taken.
    #[error("no free filename for {base} after {attempts} attempts")]
    NameExhausted { base: String, attempts: u32 },

    /// A download request named something that is not a generated document.
    #[error("invalid document filename '{name}': {reason}")]
    InvalidFilename { name: String, reason: &'static str },

    /// The requested document does not exist.
    #[error("document not found: {}", path.display())]
    NotFound { path: PathBuf },
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::InvalidFilename { .. } | RenderError::NotFound { .. } => ErrorKind::Input,
            RenderError::CreateDir { .. }
            | RenderError::Write { .. }
            | RenderError::Container(_)
            | RenderError::NameExhausted { .. } => ErrorKind::Io,
        }
    }
}

/// Any failure of an end-to-end generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Policy(e) => e.kind(),
            GenerationError::Render(e) => e.kind(),
        }
    }

    /// Only environment failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Io
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_retryable() {
        let err = GenerationError::from(RenderError::Write {
            path: PathBuf::from("/tmp/x.docx"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.is_retryable());
        assert!(err.to_string().contains("/tmp/x.docx"));
    }

    #[test]
    fn input_failures_are_not_retryable() {
        let err = GenerationError::from(PolicyError::MissingRequiredAnswer {
            question: "q23_byod".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Input);
        assert!(!err.is_retryable());

        let bad_name = RenderError::InvalidFilename {
            name: "../etc/passwd".into(),
            reason: "path separators are not allowed",
        };
        assert_eq!(bad_name.kind(), ErrorKind::Input);
    }

    #[test]
    fn template_defects_keep_their_kind() {
        let err = GenerationError::from(PolicyError::UnknownVariant {
            topic: pw_policy::Topic::Byod,
            variant: "x".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Template);
        assert!(!err.is_retryable());
    }
}
