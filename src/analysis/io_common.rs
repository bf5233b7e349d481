// Primitives shared by the readers.

use std::fs;
use std::path::Path;

use snafu::ResultExt;

use crate::analysis::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Resolves a path of the configuration file against the directory of that file.
pub fn resolve_path(root: &Path, file_path: &str) -> String {
    root.join(file_path).display().to_string()
}

/// Reads a whole input file.
pub fn read_text(path: &str) -> BTrendsResult<String> {
    let text = fs::read_to_string(path).context(OpeningFileSnafu {
        path: path.to_string(),
    })?;
    Ok(strip_bom(&text).to_string())
}

pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Reads a count of voters. Anything that is not a non-negative number counts as 0.
pub fn parse_count(cell: &str) -> Option<u64> {
    let s = cell.trim();
    if let Ok(x) = s.parse::<u64>() {
        return Some(x);
    }
    s.parse::<f64>().ok().and_then(count_from_f64)
}

pub fn count_from_f64(x: f64) -> Option<u64> {
    if x.is_finite() && x >= 0.0 {
        Some(x.trunc() as u64)
    } else {
        None
    }
}
