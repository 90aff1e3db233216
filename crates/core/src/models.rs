use std::{fmt, path::Path, str::FromStr};

use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};

use crate::config::PathsConfig;

/// How the error report is turned into comment text.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CommentMode {
    /// The raw error listing, verbatim.
    #[default]
    Plain,
    /// A diff of error listings, minus its header line.
    FullDiff,
    /// Only the added and removed lines of a diff.
    DiffLinesOnly,
}

impl CommentMode {
    pub const fn variants() -> &'static [Self] {
        &[Self::Plain, Self::FullDiff, Self::DiffLinesOnly]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::FullDiff => "full-diff",
            Self::DiffLinesOnly => "diff-lines-only",
        }
    }

    pub fn is_diff(&self) -> bool { !matches!(self, Self::Plain) }

    /// The input file this mode reads.
    pub fn source<'a>(&self, paths: &'a PathsConfig) -> &'a Path {
        match self {
            Self::Plain => &paths.errors,
            Self::FullDiff | Self::DiffLinesOnly => &paths.errors_diff,
        }
    }
}

impl FromStr for CommentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::variants().iter().find(|m| m.as_str() == s).copied().ok_or_else(|| {
            let expected =
                Self::variants().iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
            anyhow!("Unknown comment mode '{s}' (expected one of: {expected})")
        })
    }
}

impl fmt::Display for CommentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A repository, as `owner/name`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self { owner: owner.to_string(), name: name.to_string() })
            }
            _ => Err(anyhow!("Invalid repository '{s}' (expected owner/name)")),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The workflow run that triggered this invocation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WorkflowRun {
    pub id: u64,
    pub repo: RepoRef,
}

/// An artifact as listed for a workflow run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ArtifactEntry {
    pub id: u64,
    pub name: String,
}
