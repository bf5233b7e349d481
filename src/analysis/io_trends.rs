// Reader for the geographic export of the search-interest tool.
//
// The export is not a regular table: a few descriptive lines come before the header.
// Cells are never quoted, so the lines are split on commas directly.

use crate::analysis::*;

/// The header line of the export starts with this token.
pub const TRENDS_HEADER_PREFIX: &str = "Regiune,";

/// Reads a percentage cell such as `42 %`, `42%` or `42`.
///
/// Returns `None` for a blank cell or one that is not a number.
pub fn parse_percentage(cell: &str) -> Option<f64> {
    let s = cell.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses the export into one record per county line.
///
/// Returns an empty list if the header line cannot be found.
pub fn parse_trends_export(text: &str) -> Vec<TrendsRecord> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header_line = match lines.find(|l| l.starts_with(TRENDS_HEADER_PREFIX)) {
        Some(l) => l,
        None => {
            warn!(
                "parse_trends_export: no header line starting with {:?}",
                TRENDS_HEADER_PREFIX
            );
            return Vec::new();
        }
    };

    let headers: Vec<&str> = header_line.split(',').map(|h| h.trim()).collect();
    // The column of every recognized candidate.
    let candidate_cols: Vec<(usize, Candidate)> = headers
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(idx, h)| candidate_for_label(h).map(|c| (idx, c)))
        .collect();
    debug!(
        "parse_trends_export: headers: {:?} candidate columns: {:?}",
        headers, candidate_cols
    );

    let mut res: Vec<TrendsRecord> = Vec::new();
    for (idx, line) in lines.enumerate() {
        let values: Vec<&str> = line.split(',').map(|v| v.trim()).collect();
        if values.len() < headers.len() {
            debug!(
                "parse_trends_export: line {} after the header: {} cells instead of {}, skipping",
                idx + 1,
                values.len(),
                headers.len()
            );
            continue;
        }

        let mut interest = CandidateInterest::default();
        for (col, candidate) in candidate_cols.iter() {
            interest.set(*candidate, parse_percentage(values[*col]));
        }
        let record = TrendsRecord {
            county: canonical_county_name(values[0]),
            interest,
        };
        debug!("parse_trends_export: {:?}", record);
        res.push(record);
    }
    res
}
