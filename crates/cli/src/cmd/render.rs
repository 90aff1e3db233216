use anyhow::{Context, Result};
use argp::FromArgs;
use primer_bot_core::{config::Config, models::CommentMode};
use primer_bot_github::comment::render;
use typed_path::Utf8NativePathBuf;

use crate::util::{comment_mode, native_path, std_path};

#[derive(FromArgs, PartialEq, Eq, Debug)]
/// Format the error report as a markdown comment without posting it.
#[argp(subcommand, name = "render")]
pub struct Args {
    #[argp(option, from_str_fn(comment_mode))]
    /// report format: plain, full-diff or diff-lines-only
    mode: CommentMode,
    #[argp(option, short = 'i', from_str_fn(native_path))]
    /// input file (default: errors.txt or errors_diff.txt, depending on the mode)
    input: Option<Utf8NativePathBuf>,
    #[argp(option, short = 'o', from_str_fn(native_path))]
    /// write the comment to output file
    output: Option<Utf8NativePathBuf>,
}

pub fn run(args: Args, mut config: Config) -> Result<()> {
    if let Some(input) = &args.input {
        let input = std_path(input);
        if args.mode.is_diff() {
            config.paths.errors_diff = input;
        } else {
            config.paths.errors = input;
        }
    }
    let comment = render(args.mode, &config.paths).context("Failed to format comment")?;
    if let Some(out_path) = &args.output {
        std::fs::write(std_path(out_path), comment)
            .with_context(|| format!("Failed to write output file '{}'", out_path))?;
    } else {
        println!("{}", comment);
    }
    Ok(())
}
