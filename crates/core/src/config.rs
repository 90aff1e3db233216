use std::{
    fs::File,
    io::{BufReader, ErrorKind},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "primer-bot.yml";
pub const DEFAULT_ARTIFACT_NAME: &str = "typeshed_primer_errors";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub artifact: ArtifactConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub token: Option<String>,
    /// Repository in `owner/name` form.
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub name: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self { Self { name: DEFAULT_ARTIFACT_NAME.to_string() } }
}

/// Files shared between the pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Downloaded artifact archive.
    pub archive: PathBuf,
    /// Plain error listing.
    pub errors: PathBuf,
    /// Diff of the error listings between two revisions.
    pub errors_diff: PathBuf,
    /// Decimal pull request number.
    pub pr_number: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            archive: PathBuf::from("errors.zip"),
            errors: PathBuf::from("errors.txt"),
            errors_diff: PathBuf::from("errors_diff.txt"),
            pr_number: PathBuf::from("pr_number.txt"),
        }
    }
}

impl Config {
    /// Load the config file at `path`, falling back to defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to open config file {}", path.display()));
            }
        };
        serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
