pub use crate::config::*;

/// A builder for adding voter records and trends records one at a time.
///
/// ```
/// pub use county_trends::builder::Builder;
/// pub use county_trends::{Candidate, MissingValuePolicy};
/// # use county_trends::AnalysisErrors;
///
/// let mut builder = Builder::new(MissingValuePolicy::DEFAULT)?;
/// builder.add_voters("Cluj", 1000, 300)?;
/// builder.add_voters("Cluj", 500, 150)?;
/// builder.add_trends_simple("Județul Cluj", &[Some(10.0), Some(20.0), Some(30.0), Some(40.0)])?;
///
/// let result = builder.run();
/// assert_eq!(result.rows.len(), 1);
/// assert_eq!(result.rows[0].county_code, "CJ");
/// # Ok::<(), AnalysisErrors>(())
/// ```
pub struct Builder {
    pub(crate) _policy: MissingValuePolicy,
    pub(crate) _voters: Vec<VoterRecord>,
    pub(crate) _trends: Vec<TrendsRecord>,
}

impl Builder {
    pub fn new(policy: MissingValuePolicy) -> Result<Builder, AnalysisErrors> {
        Ok(Builder {
            _policy: policy,
            _voters: Vec::new(),
            _trends: Vec::new(),
        })
    }

    pub fn policy(self, policy: MissingValuePolicy) -> Result<Builder, AnalysisErrors> {
        Ok(Builder {
            _policy: policy,
            _voters: self._voters,
            _trends: self._trends,
        })
    }

    /// Adds one line of the voter roll.
    pub fn add_voters(
        &mut self,
        county: &str,
        registered: u64,
        turned_out: u64,
    ) -> Result<(), AnalysisErrors> {
        if county.trim().is_empty() {
            return Err(AnalysisErrors::EmptyCounty);
        }
        self._voters.push(VoterRecord {
            county: county.to_string(),
            registered,
            turned_out,
        });
        Ok(())
    }

    /// Adds the interest of a county, in the order of `Candidate::ALL`.
    ///
    /// The county name may still carry its `Județul ` or `Municipiul ` prefix.
    pub fn add_trends_simple(
        &mut self,
        county: &str,
        values: &[Option<f64>],
    ) -> Result<(), AnalysisErrors> {
        if values.len() != Candidate::ALL.len() {
            return Err(AnalysisErrors::WrongValueCount(values.len()));
        }
        let mut interest = CandidateInterest::default();
        for (c, v) in Candidate::ALL.iter().zip(values.iter()) {
            interest.set(*c, *v);
        }
        self.add_trends_record(&TrendsRecord {
            county: crate::canonical_county_name(county),
            interest,
        })
    }

    pub fn add_trends_record(&mut self, record: &TrendsRecord) -> Result<(), AnalysisErrors> {
        if record.county.trim().is_empty() {
            return Err(AnalysisErrors::EmptyCounty);
        }
        for c in Candidate::ALL {
            if let Some(v) = record.interest.get(c) {
                if !v.is_finite() {
                    return Err(AnalysisErrors::InvalidInterest(record.county.clone(), v));
                }
            }
        }
        self._trends.push(record.clone());
        Ok(())
    }

    pub fn run(&self) -> AnalysisResult {
        crate::run_analysis(&self._voters, &self._trends, self._policy)
    }
}
