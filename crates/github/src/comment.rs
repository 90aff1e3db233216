use std::{fs, path::Path};

use primer_bot_core::{
    config::PathsConfig,
    models::{CommentMode, RepoRef},
};

use crate::{ActionsApi, Error, Result};

/// GitHub rejects comments that are too long, so the report is cut to this length, in UTF-16
/// code units.
pub const MAX_REPORT_LEN: usize = 30_000;

pub const NO_ERRORS_MESSAGE: &str = "This change has no effect on typeshed. 🤖🎉";

pub const ERRORS_PREAMBLE: &str = "⚠ This change produces Flake8 errors in typeshed: \n";

/// Turns the raw input file contents into the report text for `mode`.
pub fn extract_report(mode: CommentMode, input: &str) -> String {
    match mode {
        CommentMode::Plain => input.to_string(),
        CommentMode::FullDiff => strip_diff_header(input).to_string(),
        CommentMode::DiffLinesOnly => changed_lines(input),
    }
}

/// Everything after the first line. Empty if there is no newline.
fn strip_diff_header(input: &str) -> &str { input.split_once('\n').map_or("", |(_, rest)| rest) }

/// Only the lines starting with `<` or `>`, joined without a trailing newline.
fn changed_lines(input: &str) -> String {
    input.split('\n').filter(|line| line.starts_with(['<', '>'])).collect::<Vec<_>>().join("\n")
}

fn segments(text: &str) -> usize { text.matches('\n').count() + 1 }

/// Byte index of the first char that would take `text` past `max_len` UTF-16 code units.
/// A char is never split, so a surrogate pair straddling the limit is dropped whole.
fn utf16_cut(text: &str, max_len: usize) -> Option<usize> {
    let mut len = 0;
    for (idx, c) in text.char_indices() {
        len += c.len_utf16();
        if len > max_len {
            return Some(idx);
        }
    }
    None
}

/// Cuts `text` to [`MAX_REPORT_LEN`] UTF-16 code units and appends a footer with the number
/// of lines dropped. Shorter text is returned as-is.
///
/// The cut may land in the middle of a line, so the count is the difference in
/// newline-delimited segments rather than the number of complete lines removed.
pub fn truncate_report(text: String) -> String {
    let Some(cut) = utf16_cut(&text, MAX_REPORT_LEN) else {
        return text;
    };
    let head = &text[..cut];
    let lines_truncated = segments(&text) - segments(head);
    tracing::info!(
        "Report truncated to {} bytes ({} lines dropped)",
        head.len(),
        lines_truncated
    );
    format!("{head}\n\n... (truncated {lines_truncated} lines) ...\n")
}

/// Builds the comment body from the (already truncated) report text.
pub fn compose_body(mode: CommentMode, report: &str) -> String {
    // U+FEFF counts as whitespace for GitHub's script runtime too
    if report.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty() {
        return NO_ERRORS_MESSAGE.to_string();
    }
    let mut body = String::with_capacity(ERRORS_PREAMBLE.len() + report.len() + 16);
    body.push_str(ERRORS_PREAMBLE);
    if mode.is_diff() {
        body.push_str("```diff\n");
        body.push_str(report);
        if !report.ends_with('\n') {
            body.push('\n');
        }
    } else {
        body.push_str("```");
        body.push_str(report);
    }
    body.push_str("```");
    body
}

/// Formats the contents of an input file as a comment body.
pub fn format_comment(mode: CommentMode, input: &str) -> String {
    compose_body(mode, &truncate_report(extract_report(mode, input)))
}

/// Reads the input file for `mode` and formats it as a comment body.
pub fn render(mode: CommentMode, paths: &PathsConfig) -> Result<String> {
    let source = mode.source(paths);
    let input = fs::read_to_string(source).map_err(Error::read(source))?;
    tracing::debug!("Read {} ({} bytes, mode {})", source.display(), input.len(), mode);
    Ok(format_comment(mode, &input))
}

pub fn read_pr_number(path: &Path) -> Result<u64> {
    let value = fs::read_to_string(path).map_err(Error::read(path))?;
    value
        .trim()
        .parse()
        .map_err(|_| Error::MalformedPrNumber { path: path.to_path_buf(), value })
}

/// Posts the report as a comment on the pull request named in `paths.pr_number`.
/// Returns the pull request number.
pub async fn publish<A: ActionsApi>(
    api: &A,
    repo: &RepoRef,
    mode: CommentMode,
    paths: &PathsConfig,
) -> Result<u64> {
    let body = render(mode, paths)?;
    let pr_number = read_pr_number(&paths.pr_number)?;
    tracing::info!("Posting {} report ({} bytes) to {}#{}", mode, body.len(), repo, pr_number);
    api.create_comment(repo, pr_number, &body).await?;
    Ok(pr_number)
}
