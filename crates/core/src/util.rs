use std::path::{Component, Path, PathBuf};

/// Resolve an archive entry name under `dir`, keeping only its normal components.
/// Returns `None` if nothing is left, e.g. for `./` or `..`.
pub fn entry_path(dir: &Path, name: impl AsRef<Path>) -> Option<PathBuf> {
    let mut parts =
        name.as_ref().components().filter(|v| matches!(v, Component::Normal(_))).peekable();
    parts.peek()?;
    let mut out = dir.to_path_buf();
    out.extend(parts);
    Some(out)
}

/// Format a download size for the logs, in SI (kilo = 1000) units.
/// Plain byte counts are printed as-is, larger units to two decimal places.
pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["kB", "MB", "GB", "TB"];
    if bytes < 1000 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1000.0;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
