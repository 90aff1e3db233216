use anyhow::{Context, Result};
use argp::FromArgs;
use primer_bot_core::{
    config::Config,
    models::{CommentMode, RepoRef},
};
use primer_bot_github::{
    GitHub,
    comment::{publish, read_pr_number, render},
};
use typed_path::Utf8NativePathBuf;

use crate::util::{
    comment_mode, github_config, native_path, repo_ref, resolve_repo, set_step_output, std_path,
};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Post the error report as a pull request comment and print the pull request number.
#[argp(subcommand, name = "post")]
pub struct Args {
    #[argp(option, from_str_fn(comment_mode))]
    /// report format: plain, full-diff or diff-lines-only
    mode: CommentMode,
    #[argp(option, from_str_fn(repo_ref))]
    /// repository as owner/name (default: $GITHUB_REPOSITORY)
    repo: Option<RepoRef>,
    #[argp(option, from_str_fn(native_path))]
    /// error listing, for plain mode (default: errors.txt)
    errors: Option<Utf8NativePathBuf>,
    #[argp(option, from_str_fn(native_path))]
    /// error listing diff, for the diff modes (default: errors_diff.txt)
    diff: Option<Utf8NativePathBuf>,
    #[argp(option, from_str_fn(native_path))]
    /// file containing the pull request number (default: pr_number.txt)
    pr_number: Option<Utf8NativePathBuf>,
    #[argp(switch)]
    /// print the comment instead of posting it
    dry_run: bool,
}

pub async fn run(args: Args, mut config: Config) -> Result<()> {
    if let Some(path) = &args.errors {
        config.paths.errors = std_path(path);
    }
    if let Some(path) = &args.diff {
        config.paths.errors_diff = std_path(path);
    }
    if let Some(path) = &args.pr_number {
        config.paths.pr_number = std_path(path);
    }

    let pr_number = if args.dry_run {
        let body = render(args.mode, &config.paths).context("Failed to format comment")?;
        let pr_number = read_pr_number(&config.paths.pr_number)?;
        tracing::info!("Dry run, not posting comment to #{}", pr_number);
        println!("{body}");
        pr_number
    } else {
        let repo = resolve_repo(args.repo, &config)?;
        let github = GitHub::new(&github_config(&config))?;
        let pr_number = publish(&github, &repo, args.mode, &config.paths)
            .await
            .with_context(|| format!("Failed to post {} report to {}", args.mode, repo))?;
        println!("{pr_number}");
        pr_number
    };
    set_step_output("pr_number", pr_number)
}
