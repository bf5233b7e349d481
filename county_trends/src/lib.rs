mod config;
mod tables;
pub mod builder;
pub mod manual;

use log::{debug, info, warn};

use std::collections::{BTreeMap, HashMap};

pub use crate::config::*;
pub use crate::tables::{
    candidate_for_label, county_code, known_county_code, CANDIDATE_LABELS, COUNTY_CODES,
};

const COUNTY_PREFIXES: [&str; 2] = ["Județul ", "Municipiul "];

/// Runs the whole analysis over records that have already been read.
///
/// Arguments:
/// * `voters` the lines of the voter roll
/// * `trends` the counties of the search-interest export, in the order of the export
/// * `policy` what to do with candidate values missing from a joined row
pub fn run_analysis(
    voters: &[VoterRecord],
    trends: &[TrendsRecord],
    policy: MissingValuePolicy,
) -> AnalysisResult {
    info!(
        "run_analysis: Processing {:?} voter records and {:?} trends records, policy: {:?}",
        voters.len(),
        trends.len(),
        policy
    );
    let turnout = aggregate_turnout(voters);
    let rows = join_counties(trends, &turnout);
    info!(
        "run_analysis: {:?} counties in the voter roll, {:?} joined rows",
        turnout.len(),
        rows.len()
    );
    let correlations = compute_correlations(&rows, policy);
    AnalysisResult { rows, correlations }
}

/// The share of registered voters who turned out, in percent.
pub fn turnout_percentage(registered: u64, turned_out: u64) -> f64 {
    if registered == 0 {
        0.0
    } else {
        (turned_out as f64 / registered as f64) * 100.0
    }
}

/// Sums the voter roll per county key.
///
/// Lines with an empty county key are ignored. The sums saturate at `u64::MAX`.
pub fn aggregate_turnout(records: &[VoterRecord]) -> BTreeMap<String, CountyTurnout> {
    let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for r in records.iter() {
        if r.county.is_empty() {
            debug!("aggregate_turnout: skipping record without county: {:?}", r);
            continue;
        }
        let entry = totals.entry(r.county.clone()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(r.registered);
        entry.1 = entry.1.saturating_add(r.turned_out);
    }

    totals
        .into_iter()
        .map(|(county, (registered, turned_out))| {
            let ct = CountyTurnout {
                county: county.clone(),
                registered,
                turned_out,
                turnout_percentage: turnout_percentage(registered, turned_out),
            };
            debug!("aggregate_turnout: {:?}", ct);
            (county, ct)
        })
        .collect()
}

/// Removes the `Județul ` and `Municipiul ` markers from a county name.
pub fn canonical_county_name(raw: &str) -> String {
    COUNTY_PREFIXES
        .iter()
        .fold(raw.to_string(), |name, prefix| name.replacen(prefix, "", 1))
}

/// Finds the code of a county key of the voter roll.
///
/// The key may be a code (`CJ`) or a display name, with or without its prefix.
pub fn resolve_county_code(key: &str) -> Option<&'static str> {
    known_county_code(key).or_else(|| county_code(&canonical_county_name(key)))
}

/// Joins the trends records with the turnout of their county.
///
/// The output follows the order of `trends`. A record whose county has no code, or
/// whose code has no turnout, is dropped.
pub fn join_counties(
    trends: &[TrendsRecord],
    turnout: &BTreeMap<String, CountyTurnout>,
) -> Vec<JoinedRow> {
    let mut by_code: HashMap<&'static str, &CountyTurnout> = HashMap::new();
    for (key, ct) in turnout.iter() {
        match resolve_county_code(key) {
            Some(code) => {
                if let Some(previous) = by_code.get(code) {
                    warn!(
                        "join_counties: county keys {:?} and {:?} both resolve to {}, keeping {:?}",
                        previous.county, key, code, previous.county
                    );
                } else {
                    by_code.insert(code, ct);
                }
            }
            None => {
                debug!("join_counties: no code for turnout key {:?}", key);
            }
        }
    }

    let mut res: Vec<JoinedRow> = Vec::new();
    for tr in trends.iter() {
        let joined = county_code(&tr.county)
            .and_then(|code| by_code.get(code).map(|ct| (code, ct.turnout_percentage)));
        match joined {
            Some((county_code, turnout_percentage)) => res.push(JoinedRow {
                county: tr.county.clone(),
                county_code,
                turnout_percentage,
                interest: tr.interest,
            }),
            None => {
                debug!("join_counties: dropping unmatched county {:?}", tr.county);
            }
        }
    }
    res
}

/// The Pearson product-moment correlation coefficient of two series.
///
/// Returns 0 when the series are empty, of different lengths, or when one of them
/// has no variance. A NaN in the input gives a NaN.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n == 0 || n != y.len() {
        return 0.0;
    }
    if x.iter().chain(y.iter()).any(|v| v.is_nan()) {
        return f64::NAN;
    }
    if is_constant(x) || is_constant(y) {
        return 0.0;
    }
    let nf = n as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = nf * sum_xy - sum_x * sum_y;
    let var_x = nf * sum_x2 - sum_x * sum_x;
    let var_y = nf * sum_y2 - sum_y * sum_y;
    // Rounding can leave a tiny negative term.
    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }
    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

// The sums of a constant series do not always cancel out exactly in floating point.
fn is_constant(s: &[f64]) -> bool {
    s.iter().all(|v| *v == s[0])
}

/// The turnout series and the interest series of one candidate over the joined rows.
pub fn candidate_series(
    rows: &[JoinedRow],
    candidate: Candidate,
    policy: MissingValuePolicy,
) -> (Vec<f64>, Vec<f64>) {
    match policy {
        MissingValuePolicy::Propagate => rows
            .iter()
            .map(|r| {
                (
                    r.turnout_percentage,
                    r.interest.get(candidate).unwrap_or(f64::NAN),
                )
            })
            .unzip(),
        MissingValuePolicy::ExcludeRow => rows
            .iter()
            .filter_map(|r| {
                r.interest
                    .get(candidate)
                    .map(|v| (r.turnout_percentage, v))
            })
            .unzip(),
    }
}

pub fn compute_correlations(rows: &[JoinedRow], policy: MissingValuePolicy) -> CorrelationResult {
    let mut coefficients = [0.0; 4];
    for candidate in Candidate::ALL {
        let (turnout, interest) = candidate_series(rows, candidate, policy);
        if turnout.len() < rows.len() {
            debug!(
                "compute_correlations: {}: {} rows without a value left out",
                candidate.key(),
                rows.len() - turnout.len()
            );
        }
        let r = pearson_correlation(&turnout, &interest);
        info!(
            "Correlation for {}: {:.3} ({})",
            candidate.display_name(),
            r,
            CorrelationStrength::classify(r).key()
        );
        coefficients[candidate as usize] = r;
    }
    CorrelationResult { coefficients }
}
