// filename.rs - Deterministic artifact names.
//
// <Company_Slug>_Acceptable_Use_Policy_<YYYYMMDD>_<HHMMSS>_<digest10>.docx
//
// The digest covers the organization key and the full-precision timestamp,
// so two organizations generating in the same second still get distinct
// names.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::docx::DOCX_EXTENSION;
use crate::error::RenderError;

pub const SLUG_MAX_LEN: usize = 40;
pub const SLUG_FALLBACK: &str = "Organization";
pub const DIGEST_LEN: usize = 10;
/// Highest `-vN` suffix tried before giving up on a name.
pub const MAX_VERSIONS: u32 = 100;

const POLICY_LABEL: &str = "Acceptable_Use_Policy";

/// Reduce a company name to ASCII alphanumerics joined by underscores.
pub fn company_slug(company_name: &str) -> String {
    let mut slug = String::new();
    let mut gap = false;
    for c in company_name.chars() {
        if c.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('_');
            }
            gap = false;
            slug.push(c);
        } else {
            gap = true;
        }
    }
    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
        while slug.ends_with('_') {
            slug.pop();
        }
    }
    if slug.is_empty() {
        SLUG_FALLBACK.to_string()
    } else {
        slug
    }
}

/// Hex digest identifying one generation request.
pub fn generation_digest(org_key: &str, generated_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(org_key.as_bytes());
    hasher.update(b"\n");
    hasher.update(generated_at.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..DIGEST_LEN].to_string()
}

/// A derived artifact name without extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    stem: String,
}

impl ArtifactName {
    pub fn derive(org_key: &str, company_name: &str, generated_at: DateTime<Utc>) -> Self {
        let stem = format!(
            "{}_{}_{}_{}",
            company_slug(company_name),
            POLICY_LABEL,
            generated_at.format("%Y%m%d_%H%M%S"),
            generation_digest(org_key, generated_at),
        );
        Self { stem }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn filename(&self) -> String {
        self.versioned(1)
    }

    /// Name for the nth attempt; the first attempt carries no suffix.
    pub fn versioned(&self, n: u32) -> String {
        if n <= 1 {
            format!("{}.{}", self.stem, DOCX_EXTENSION)
        } else {
            format!("{}-v{}.{}", self.stem, n, DOCX_EXTENSION)
        }
    }
}

/// Reject anything that is not a bare .docx file name.
pub fn validate_filename(name: &str) -> Result<(), RenderError> {
    let reason = if name.is_empty() {
        Some("empty name")
    } else if name.contains('/') || name.contains('\\') {
        Some("contains a path separator")
    } else if name.contains("..") {
        Some("contains a parent reference")
    } else if name.starts_with('.') {
        Some("hidden file")
    } else if name.chars().any(char::is_control) {
        Some("contains control characters")
    } else if !name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(DOCX_EXTENSION))
    {
        Some("not a .docx file")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(RenderError::InvalidFilename {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
