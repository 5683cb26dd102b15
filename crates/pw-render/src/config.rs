// config.rs - Renderer configuration.
//
// The output directory is an explicit value handed to the Renderer at
// construction. Nothing here reads the environment; the binary layers
// config files and environment variables on top of these defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory name used when no output directory is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "generated_policies";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Where finished documents are written. Created on first use.
    pub output_dir: PathBuf,
}

impl RenderConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// `<project_root>/generated_policies`.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        Self::new(project_root.as_ref().join(DEFAULT_OUTPUT_DIR))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}
