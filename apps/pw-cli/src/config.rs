// config.rs - Layered CLI configuration.
//
// project defaults -> .pw/config.toml (or --config) -> GENERATED_POLICIES_DIR
// -> --output-dir. Later layers win. Relative paths in the file are resolved
// against the project root.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pw_render::{RenderConfig, DEFAULT_OUTPUT_DIR};
use serde::Deserialize;

pub const CONFIG_DIR: &str = ".pw";
pub const CONFIG_FILE: &str = "config.toml";
pub const LEDGER_FILE: &str = "generations.jsonl";
pub const OUTPUT_DIR_ENV: &str = "GENERATED_POLICIES_DIR";
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "/download/policies";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PwConfig {
    pub project_root: PathBuf,
    pub output_dir: PathBuf,
    /// URL path under which generated documents are served.
    pub download_prefix: String,
    pub ledger_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    output: OutputSection,
    #[serde(default)]
    ledger: LedgerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    dir: Option<PathBuf>,
    download_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LedgerSection {
    path: Option<PathBuf>,
}

impl PwConfig {
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref().to_path_buf();
        Self {
            output_dir: root.join(DEFAULT_OUTPUT_DIR),
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_string(),
            ledger_path: root.join(CONFIG_DIR).join(LEDGER_FILE),
            project_root: root,
        }
    }

    /// Defaults plus the config file. An explicit path must exist; the
    /// default `.pw/config.toml` is optional.
    pub fn load(project_root: impl AsRef<Path>, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Self::for_project(project_root);
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = config.project_root.join(CONFIG_DIR).join(CONFIG_FILE);
                if !default.exists() {
                    return Ok(config);
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let file: ConfigFile =
            toml::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))?;
        config.apply_file(file);
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(dir) = file.output.dir {
            self.output_dir = self.resolve(dir);
        }
        if let Some(prefix) = file.output.download_prefix {
            self.download_prefix = prefix;
        }
        if let Some(path) = file.ledger.path {
            self.ledger_path = self.resolve(path);
        }
    }

    /// Apply the `GENERATED_POLICIES_DIR` value, if set and non-empty.
    pub fn with_env_output_dir(mut self, value: Option<String>) -> Self {
        if let Some(dir) = value.filter(|v| !v.trim().is_empty()) {
            self.output_dir = self.resolve(PathBuf::from(dir));
        }
        self
    }

    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.output_dir = dir;
        }
        self
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new(&self.output_dir)
    }

    pub fn download_url(&self, filename: &str) -> String {
        format!("{}/{}", self.download_prefix.trim_end_matches('/'), filename)
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.project_root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_nest_under_project_root() {
        let config = PwConfig::for_project("/srv/app");
        assert_eq!(config.output_dir, PathBuf::from("/srv/app/generated_policies"));
        assert_eq!(config.ledger_path, PathBuf::from("/srv/app/.pw/generations.jsonl"));
        assert_eq!(config.download_prefix, "/download/policies");
    }

    #[test]
    fn missing_default_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = PwConfig::load(tmp.path(), None).unwrap();
        assert_eq!(config, PwConfig::for_project(tmp.path()));
    }

    #[test]
    fn file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_DIR).join(CONFIG_FILE),
            "[output]\ndir = \"docs/out\"\ndownload_prefix = \"/files/\"\n\n[ledger]\npath = \"/var/pw/ledger.jsonl\"\n",
        )
        .unwrap();
        let config = PwConfig::load(tmp.path(), None).unwrap();
        assert_eq!(config.output_dir, tmp.path().join("docs/out"));
        assert_eq!(config.ledger_path, PathBuf::from("/var/pw/ledger.jsonl"));
        assert_eq!(config.download_url("a.docx"), "/files/a.docx");
    }

    #[test]
    fn malformed_file_names_the_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[output\n").unwrap();
        let err = PwConfig::load(tmp.path(), Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.toml"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(PwConfig::load(tmp.path(), Some(&tmp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn env_then_flag_override() {
        let config = PwConfig::for_project("/srv/app").with_env_output_dir(Some("from-env".into()));
        assert_eq!(config.output_dir, PathBuf::from("/srv/app/from-env"));

        let config = config.with_output_dir(Some(PathBuf::from("/tmp/flag")));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/flag"));

        let unchanged = PwConfig::for_project("/srv/app").with_env_output_dir(Some("  ".into()));
        assert_eq!(unchanged.output_dir, PathBuf::from("/srv/app/generated_policies"));
    }
}
