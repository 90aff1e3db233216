use anyhow::{Context, Result};
use argp::FromArgs;
use primer_bot_core::{
    config::Config,
    models::{RepoRef, WorkflowRun},
};
use primer_bot_github::{
    GitHub,
    artifact::{extract_archive, fetch_artifact},
};
use typed_path::Utf8NativePathBuf;

use crate::util::{github_config, native_path, repo_ref, resolve_repo, std_path};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Download the error log artifact of a workflow run.
#[argp(subcommand, name = "download")]
pub struct Args {
    #[argp(option)]
    /// workflow run ID
    run_id: u64,
    #[argp(option, from_str_fn(repo_ref))]
    /// repository as owner/name (default: $GITHUB_REPOSITORY)
    repo: Option<RepoRef>,
    #[argp(option)]
    /// artifact name (default: typeshed_primer_errors)
    artifact: Option<String>,
    #[argp(option, short = 'o', from_str_fn(native_path))]
    /// write the zip archive to this file (default: errors.zip)
    output: Option<Utf8NativePathBuf>,
    #[argp(option, from_str_fn(native_path))]
    /// also extract the archive into this directory
    extract: Option<Utf8NativePathBuf>,
}

pub async fn run(args: Args, config: Config) -> Result<()> {
    let run = WorkflowRun { id: args.run_id, repo: resolve_repo(args.repo, &config)? };
    let name = args.artifact.unwrap_or_else(|| config.artifact.name.clone());
    let output = args.output.as_ref().map(std_path).unwrap_or_else(|| config.paths.archive.clone());
    let github = GitHub::new(&github_config(&config))?;
    let archive = fetch_artifact(&github, &run, &name, &output).await.with_context(|| {
        format!("Failed to download artifact '{}' from {} run {}", name, run.repo, run.id)
    })?;
    if let Some(dir) = &args.extract {
        let dir = std_path(dir);
        let files = extract_archive(&archive, &dir)
            .with_context(|| format!("Failed to extract {}", archive.display()))?;
        tracing::info!("Extracted {} files to {}", files.len(), dir.display());
    }
    Ok(())
}
