use std::{
    env,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use primer_bot_core::{
    config::{Config, GitHubConfig},
    models::{CommentMode, RepoRef},
};
use typed_path::Utf8NativePathBuf;

// For argp::FromArgs
pub fn native_path(value: &str) -> Result<Utf8NativePathBuf, String> {
    Ok(Utf8NativePathBuf::from(value))
}

// For argp::FromArgs
pub fn repo_ref(value: &str) -> Result<RepoRef, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

// For argp::FromArgs
pub fn comment_mode(value: &str) -> Result<CommentMode, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

pub fn std_path(path: &Utf8NativePathBuf) -> PathBuf {
    PathBuf::from(path.with_platform_encoding().as_str())
}

/// The GitHub settings, with the token taken from `GITHUB_TOKEN` if not configured.
pub fn github_config(config: &Config) -> GitHubConfig {
    GitHubConfig {
        token: config.github.token.clone().or_else(|| env::var("GITHUB_TOKEN").ok()),
        repository: config.github.repository.clone(),
    }
}

/// Picks the repository from the command line, the config file or `GITHUB_REPOSITORY`,
/// in that order.
pub fn resolve_repo(arg: Option<RepoRef>, config: &Config) -> Result<RepoRef> {
    if let Some(repo) = arg {
        return Ok(repo);
    }
    let value = config
        .github
        .repository
        .clone()
        .or_else(|| env::var("GITHUB_REPOSITORY").ok())
        .ok_or_else(|| anyhow!("No repository given (use --repo or set GITHUB_REPOSITORY)"))?;
    value.parse()
}

/// Exposes `name` as a step output when running inside GitHub Actions.
pub fn set_step_output(name: &str, value: impl std::fmt::Display) -> Result<()> {
    let Some(path) = env::var_os("GITHUB_OUTPUT") else {
        return Ok(());
    };
    append_step_output(Path::new(&path), name, value)
}

fn append_step_output(path: &Path, name: &str, value: impl std::fmt::Display) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{name}={value}").context("Failed to write step output")?;
    Ok(())
}
