//! # pw-render
//!
//! Turns a [`pw_policy::DocumentTree`] into a `.docx` file on disk.
//!
//! - [`docx`] encodes the tree as an Office Open XML package with a fixed
//!   part order, so identical trees produce identical bytes.
//! - [`filename`] derives collision-resistant names from the company name,
//!   the generation timestamp and a digest of the organization key.
//! - [`Renderer`] writes through a temp file and a no-clobber rename.
//! - [`PolicyGenerator`] composes and renders in one call.

pub mod config;
pub mod docx;
pub mod error;
pub mod filename;
pub mod generator;
pub mod renderer;

pub use config::{RenderConfig, DEFAULT_OUTPUT_DIR};
pub use docx::{DOCX_CONTENT_TYPE, DOCX_EXTENSION};
pub use error::{GenerationError, RenderError};
pub use filename::{company_slug, validate_filename, ArtifactName};
pub use generator::PolicyGenerator;
pub use renderer::{GenerationResult, Renderer};
