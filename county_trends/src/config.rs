// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The candidates followed in the search-interest export.
///
/// The order of the variants is the order used everywhere in the output.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Candidate {
    NicusorDan,
    CrinAntonescu,
    GeorgeSimion,
    VictorPonta,
}

impl Candidate {
    pub const ALL: [Candidate; 4] = [
        Candidate::NicusorDan,
        Candidate::CrinAntonescu,
        Candidate::GeorgeSimion,
        Candidate::VictorPonta,
    ];

    /// The identifier used in the joined rows and in the correlation mapping.
    pub fn key(self) -> &'static str {
        match self {
            Candidate::NicusorDan => "nicusorDan",
            Candidate::CrinAntonescu => "crinAntonescu",
            Candidate::GeorgeSimion => "georgeSimion",
            Candidate::VictorPonta => "victorPonta",
        }
    }

    /// The name of the candidate, as it should be displayed to a reader.
    pub fn display_name(self) -> &'static str {
        match self {
            Candidate::NicusorDan => "Nicușor Dan",
            Candidate::CrinAntonescu => "Crin Antonescu",
            Candidate::GeorgeSimion => "George Simion",
            Candidate::VictorPonta => "Victor Ponta",
        }
    }

    pub fn from_key(key: &str) -> Option<Candidate> {
        Candidate::ALL.iter().copied().find(|c| c.key() == key)
    }
}

/// One line of the voter roll. Many lines usually share the same county.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoterRecord {
    pub county: String,
    pub registered: u64,
    pub turned_out: u64,
}

/// The search interest of every candidate in one county, in percent.
///
/// A value is `None` when the source cell was empty or could not be read
/// as a number. It is never replaced by zero.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct CandidateInterest {
    pub nicusor_dan: Option<f64>,
    pub crin_antonescu: Option<f64>,
    pub george_simion: Option<f64>,
    pub victor_ponta: Option<f64>,
}

impl CandidateInterest {
    pub fn get(&self, candidate: Candidate) -> Option<f64> {
        match candidate {
            Candidate::NicusorDan => self.nicusor_dan,
            Candidate::CrinAntonescu => self.crin_antonescu,
            Candidate::GeorgeSimion => self.george_simion,
            Candidate::VictorPonta => self.victor_ponta,
        }
    }

    pub fn set(&mut self, candidate: Candidate, value: Option<f64>) {
        let slot = match candidate {
            Candidate::NicusorDan => &mut self.nicusor_dan,
            Candidate::CrinAntonescu => &mut self.crin_antonescu,
            Candidate::GeorgeSimion => &mut self.george_simion,
            Candidate::VictorPonta => &mut self.victor_ponta,
        };
        *slot = value;
    }
}

/// One county of the search-interest export.
///
/// The county is the display name, without its `Județul ` or `Municipiul ` prefix.
#[derive(PartialEq, Debug, Clone)]
pub struct TrendsRecord {
    pub county: String,
    pub interest: CandidateInterest,
}

// ******** Output data structures *********

/// The totals of the voter roll for one county.
#[derive(PartialEq, Debug, Clone)]
pub struct CountyTurnout {
    pub county: String,
    pub registered: u64,
    pub turned_out: u64,
    /// 100 * turned_out / registered, and exactly 0 when nobody is registered.
    pub turnout_percentage: f64,
}

/// A county present in both sources.
#[derive(PartialEq, Debug, Clone)]
pub struct JoinedRow {
    pub county: String,
    pub county_code: &'static str,
    pub turnout_percentage: f64,
    pub interest: CandidateInterest,
}

/// How a correlation reads, following the thresholds of the dashboard.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CorrelationStrength {
    /// Above `STRONG_CORRELATION_THRESHOLD`.
    Positive,
    /// Below `-STRONG_CORRELATION_THRESHOLD`.
    Negative,
    Weak,
    /// The coefficient is not a number (missing values were propagated).
    Undefined,
}

pub const STRONG_CORRELATION_THRESHOLD: f64 = 0.2;

impl CorrelationStrength {
    pub fn classify(coefficient: f64) -> CorrelationStrength {
        if coefficient.is_nan() {
            CorrelationStrength::Undefined
        } else if coefficient > STRONG_CORRELATION_THRESHOLD {
            CorrelationStrength::Positive
        } else if coefficient < -STRONG_CORRELATION_THRESHOLD {
            CorrelationStrength::Negative
        } else {
            CorrelationStrength::Weak
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            CorrelationStrength::Positive => "positive",
            CorrelationStrength::Negative => "negative",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Undefined => "undefined",
        }
    }
}

/// The Pearson coefficient between turnout and the interest of each candidate.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CorrelationResult {
    pub(crate) coefficients: [f64; 4],
}

impl CorrelationResult {
    pub fn get(&self, candidate: Candidate) -> f64 {
        self.coefficients[candidate as usize]
    }

    pub fn strength(&self, candidate: Candidate) -> CorrelationStrength {
        CorrelationStrength::classify(self.get(candidate))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Candidate, f64)> + '_ {
        Candidate::ALL.iter().map(|c| (*c, self.get(*c)))
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisResult {
    pub rows: Vec<JoinedRow>,
    pub correlations: CorrelationResult,
}

/// Errors raised when records are added through the builder.
#[derive(PartialEq, Debug, Clone)]
pub enum AnalysisErrors {
    EmptyCounty,
    WrongValueCount(usize),
    InvalidInterest(String, f64),
}

impl Error for AnalysisErrors {}

impl Display for AnalysisErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisErrors::EmptyCounty => write!(f, "AnalysisError: empty county name"),
            AnalysisErrors::WrongValueCount(n) => write!(
                f,
                "AnalysisError: expected {} candidate values, got {}",
                Candidate::ALL.len(),
                n
            ),
            AnalysisErrors::InvalidInterest(county, v) => {
                write!(f, "AnalysisError: county {}: invalid interest {}", county, v)
            }
        }
    }
}

// ********* Configuration **********

/// What to do with a joined row that lacks the value of a candidate.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MissingValuePolicy {
    /// The missing value enters the sums as NaN, so the coefficient of that
    /// candidate is NaN. This is what the dashboard has always reported.
    Propagate,
    /// The row is left out of the series of that candidate only.
    ExcludeRow,
}

impl MissingValuePolicy {
    pub const DEFAULT: MissingValuePolicy = MissingValuePolicy::Propagate;

    pub fn key(self) -> &'static str {
        match self {
            MissingValuePolicy::Propagate => "propagate",
            MissingValuePolicy::ExcludeRow => "exclude",
        }
    }
}
