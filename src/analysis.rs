use log::{debug, info, warn};

use county_trends::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::analysis::config_reader::*;
use crate::analysis::io_common::read_text;
use crate::analysis::io_trends::parse_trends_export;
use crate::analysis::io_voters::{parse_voter_roll, read_voter_roll_excel};
use crate::args::Args;

pub mod config_reader;
mod io_common;
mod io_trends;
mod io_voters;

#[derive(Debug, Snafu)]
pub enum TrendsError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Workbook {path} has no worksheet named {name:?}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error reading the header of the voter roll"))]
    CsvHeader { source: csv::Error },
    #[snafu(display("The voter roll has no column {column:?} (found: {found:?})"))]
    MissingColumn { column: String, found: Vec<String> },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Unknown voter roll type {provider:?}: expected csv or xlsx"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown missing-value policy {policy:?}: expected propagate or exclude"))]
    UnknownMissingValuePolicy { policy: String },
    #[snafu(display("No input: pass --config, or both --voters and --trends"))]
    MissingInput {},
    #[snafu(display("Difference detected between computed summary and reference summary"))]
    SummaryMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TrendsResult<T> = Result<T, TrendsError>;
pub type BTrendsResult<T> = Result<T, Box<TrendsError>>;

/// Reads the voter roll described by the source.
fn read_voter_records(source: &VoterFileSource) -> BTrendsResult<Vec<VoterRecord>> {
    let columns = source.columns();
    info!(
        "Attempting to read voter roll {:?} ({:?})",
        source.file_path, source.provider
    );
    match source.provider()? {
        VoterProvider::Csv => {
            let text = read_text(&source.file_path)?;
            parse_voter_roll(&text, &columns)
        }
        VoterProvider::Xlsx => read_voter_roll_excel(&source.file_path, source, &columns),
    }
}

fn interest_to_json(interest: &CandidateInterest) -> JSMap<String, JSValue> {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for c in Candidate::ALL {
        m.insert(c.key().to_string(), json!(interest.get(c)));
    }
    m
}

fn rows_to_json(rows: &[JoinedRow]) -> Vec<JSValue> {
    rows.iter()
        .map(|r| {
            let mut m: JSMap<String, JSValue> = JSMap::new();
            m.insert("county".to_string(), json!(r.county));
            m.insert("countyCode".to_string(), json!(r.county_code));
            m.insert("turnoutPercentage".to_string(), json!(r.turnout_percentage));
            m.extend(interest_to_json(&r.interest));
            JSValue::Object(m)
        })
        .collect()
}

fn correlations_to_json(correlations: &CorrelationResult) -> JSMap<String, JSValue> {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (c, r) in correlations.iter() {
        // NaN has no JSON representation: it becomes null.
        m.insert(
            c.key().to_string(),
            json!({"coefficient": r, "strength": CorrelationStrength::classify(r).key()}),
        );
    }
    m
}

pub fn build_summary_js(
    analysis_name: &str,
    policy: MissingValuePolicy,
    result: &AnalysisResult,
) -> JSValue {
    json!({
        "config": {
            "analysis": analysis_name,
            "missingValues": policy.key(),
        },
        "counties": rows_to_json(&result.rows),
        "correlations": correlations_to_json(&result.correlations),
    })
}

fn write_summary(out: &str, content: &str) -> BTrendsResult<()> {
    if out == "stdout" {
        println!("{}", content);
    } else {
        info!("Writing summary to {}", out);
        fs::write(out, content).context(WritingFileSnafu {
            path: out.to_string(),
        })?;
    }
    Ok(())
}

/// Where the summary goes: the command line first, then the output directory of the
/// configuration, then the standard output.
fn summary_destination(args: &Args, config: &AnalysisConfig) -> String {
    if let Some(out) = args.out.clone() {
        return out;
    }
    match config.output_settings.output_directory.clone() {
        Some(dir) if !dir.is_empty() => Path::new(dir.as_str())
            .join("summary.json")
            .display()
            .to_string(),
        _ => "stdout".to_string(),
    }
}

/// Compares the summary with a reference. The differences are printed.
pub fn check_summary(summary: &JSValue, summary_ref: &JSValue) -> BTrendsResult<()> {
    let pretty_js = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    let pretty_js_ref = serde_json::to_string_pretty(summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_ref.as_str(), pretty_js.as_str(), "\n");
        return Err(Box::new(TrendsError::SummaryMismatch {}));
    }
    Ok(())
}

pub fn run_analysis(args: &Args) -> BTrendsResult<()> {
    let config = assemble_config(args)?;
    info!("config: {:?}", config);
    let policy = config.rules.missing_value_policy()?;

    // Both inputs are read before anything is computed.
    let trends_text = read_text(&config.trends_file_source.file_path)?;
    let voters = read_voter_records(&config.voter_file_source)?;
    debug!("run_analysis: {} voter records", voters.len());

    let trends = parse_trends_export(&trends_text);
    if trends.is_empty() {
        warn!(
            "No county could be read from {}: the correlations will all be 0",
            config.trends_file_source.file_path
        );
    }

    let result = county_trends::run_analysis(&voters, &trends, policy);

    let summary = build_summary_js(&config.analysis_name(), policy, &result);
    let pretty_js = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {})?;
    write_summary(&summary_destination(args, &config), &pretty_js)?;

    // The reference summary, if provided for comparison
    if let Some(reference_p) = args.reference.clone() {
        let summary_ref = read_summary(reference_p)?;
        check_summary(&summary, &summary_ref)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::io_voters::VoterColumns;

    const HEADER: &str = "Regiune,Nicusor dan: (04.04.2025 – 04.05.2025),Crin Antonescu: (04.04.2025 – 04.05.2025),George Simion: (04.04.2025 – 04.05.2025),Victor Ponta: (04.04.2025 – 04.05.2025)";

    const VOTERS: &str = "Judet,Înscriși pe liste permanente,LP\nCluj,1000,300\nCluj,500,150\n";

    fn trends_text(lines: &[&str]) -> String {
        let mut s = String::from("Categorie: Toate categoriile\n\n");
        s.push_str(HEADER);
        s.push('\n');
        for l in lines {
            s.push_str(l);
            s.push('\n');
        }
        s
    }

    // The voter roll is CSV text.
    fn analyze_texts(
        voter_text: &str,
        trends_text: &str,
        columns: &VoterColumns,
        policy: MissingValuePolicy,
    ) -> BTrendsResult<AnalysisResult> {
        let voters = parse_voter_roll(voter_text, columns)?;
        let trends = parse_trends_export(trends_text);
        Ok(county_trends::run_analysis(&voters, &trends, policy))
    }

    fn args() -> Args {
        Args {
            config: None,
            voters: None,
            voters_type: None,
            excel_worksheet_name: None,
            trends: None,
            missing_values: None,
            out: None,
            reference: None,
            verbose: false,
        }
    }

    #[test]
    fn cluj_end_to_end() {
        let res = analyze_texts(
            VOTERS,
            &trends_text(&["Cluj,10 %,20 %,30 %,40 %"]),
            &VoterColumns::default(),
            MissingValuePolicy::DEFAULT,
        )
        .unwrap();
        assert_eq!(res.rows.len(), 1);
        let row = &res.rows[0];
        assert_eq!(row.county, "Cluj");
        assert_eq!(row.county_code, "CJ");
        assert!((row.turnout_percentage - 30.0).abs() < 1e-9);
        assert_eq!(row.interest.nicusor_dan, Some(10.0));
        assert_eq!(row.interest.crin_antonescu, Some(20.0));
        assert_eq!(row.interest.george_simion, Some(30.0));
        assert_eq!(row.interest.victor_ponta, Some(40.0));
        // A single county has no variance.
        for (_, r) in res.correlations.iter() {
            assert_eq!(r, 0.0);
        }
    }

    #[test]
    fn parsing_twice_gives_the_same_rows() {
        let voters = "Judet,Înscriși pe liste permanente,LP\nCJ,100,30\nAB,100,20\nB,200,90\n";
        let text = trends_text(&[
            "Județul Cluj,10 %,20 %,30 %,40 %",
            "Județul Alba,15 %,25 %,,45 %",
            "Municipiul București,20 %,10 %,35 %,5 %",
        ]);
        let policy = MissingValuePolicy::ExcludeRow;
        let a = analyze_texts(voters, &text, &VoterColumns::default(), policy).unwrap();
        let b = analyze_texts(voters, &text, &VoterColumns::default(), policy).unwrap();
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.rows.len(), 3);
        assert_eq!(a.rows[2].county_code, "B");
        assert_eq!(a.correlations, b.correlations);
    }

    #[test]
    fn no_trends_header_gives_empty_result() {
        let res = analyze_texts(
            VOTERS,
            "Categorie: Toate categoriile\n\nCluj,10 %,20 %,30 %,40 %\n",
            &VoterColumns::default(),
            MissingValuePolicy::DEFAULT,
        )
        .unwrap();
        assert!(res.rows.is_empty());
        for c in Candidate::ALL {
            assert_eq!(res.correlations.get(c), 0.0);
        }
    }

    #[test]
    fn bad_voter_header_is_an_error() {
        let res = analyze_texts(
            "County,Registered,Voted\nCluj,1000,300\n",
            &trends_text(&["Cluj,10 %,20 %,30 %,40 %"]),
            &VoterColumns::default(),
            MissingValuePolicy::DEFAULT,
        );
        match res.map_err(|e| *e) {
            Err(TrendsError::MissingColumn { column, .. }) => assert_eq!(column, "Judet"),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn summary_json() {
        let voters = "Judet,Înscriși pe liste permanente,LP\nCJ,100,30\nAB,100,20\n";
        let text = trends_text(&["Cluj,10 %,20 %,30 %,40 %", "Alba,20 %,,30 %,20 %"]);
        let res = analyze_texts(
            voters,
            &text,
            &VoterColumns::default(),
            MissingValuePolicy::Propagate,
        )
        .unwrap();
        let js = build_summary_js("test", MissingValuePolicy::Propagate, &res);
        assert_eq!(js["config"]["missingValues"], json!("propagate"));
        assert_eq!(js["counties"][0]["countyCode"], json!("CJ"));
        assert_eq!(js["counties"][0]["victorPonta"], json!(40.0));
        assert_eq!(js["counties"][1]["crinAntonescu"], JSValue::Null);
        assert_eq!(
            js["correlations"]["crinAntonescu"],
            json!({"coefficient": null, "strength": "undefined"})
        );
        assert_eq!(js["correlations"]["georgeSimion"]["coefficient"], json!(0.0));
        assert_eq!(js["correlations"]["georgeSimion"]["strength"], json!("weak"));
        // Turnout 30 -> 10, turnout 20 -> 20.
        assert_eq!(
            js["correlations"]["nicusorDan"]["strength"],
            json!("negative")
        );
        assert!(check_summary(&js, &js.clone()).is_ok());
        let mut other = js.clone();
        other["config"]["analysis"] = json!("other");
        assert!(check_summary(&js, &other).is_err());
    }

    #[test]
    fn summary_read_back_matches_itself() {
        let js = json!({"turnoutPercentage": 37.202380952380956});
        let back: JSValue =
            serde_json::from_str(&serde_json::to_string_pretty(&js).unwrap()).unwrap();
        assert!(check_summary(&js, &back).is_ok());

        for registered in 1000..3000u64 {
            let pct = turnout_percentage(registered, registered * 37 / 100 + 3);
            let js = json!({ "turnoutPercentage": pct });
            let back: JSValue =
                serde_json::from_str(&serde_json::to_string_pretty(&js).unwrap()).unwrap();
            assert!(check_summary(&js, &back).is_ok(), "{}", pct);
        }
    }

    #[test]
    fn run_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let voters_p = dir.path().join("presence_now.csv");
        let trends_p = dir.path().join("geoMap.csv");
        let out_p = dir.path().join("summary.json");
        // Turnouts without a short decimal representation.
        let voters = "Judet,Înscriși pe liste permanente,LP\nCJ,1008,375\nAB,2983,1107\n";
        fs::write(&voters_p, voters).unwrap();
        fs::write(
            &trends_p,
            trends_text(&[
                "Județul Cluj,10 %,20 %,30 %,40 %",
                "Județul Alba,15 %,25 %,35 %,45 %",
            ]),
        )
        .unwrap();

        let mut a = args();
        a.voters = Some(voters_p.display().to_string());
        a.trends = Some(trends_p.display().to_string());
        a.out = Some(out_p.display().to_string());
        run_analysis(&a).unwrap();

        let written: JSValue =
            serde_json::from_str(&fs::read_to_string(&out_p).unwrap()).unwrap();
        assert_eq!(written["counties"][0]["county"], json!("Cluj"));
        assert_eq!(
            written["counties"][0]["turnoutPercentage"],
            json!(turnout_percentage(1008, 375))
        );
        assert_eq!(written["config"]["analysis"], json!("presence_now.csv / geoMap.csv"));

        // The summary is its own reference.
        a.reference = Some(out_p.display().to_string());
        a.out = Some(dir.path().join("again.json").display().to_string());
        run_analysis(&a).unwrap();

        a.missing_values = Some("exclude".to_string());
        match run_analysis(&a).map_err(|e| *e) {
            Err(TrendsError::SummaryMismatch {}) => {}
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn voter_roll_from_excel() {
        let source = VoterFileSource {
            provider: Some("xlsx".to_string()),
            file_path: format!("{}/testdata/presence_now.xlsx", env!("CARGO_MANIFEST_DIR")),
            county_column: None,
            registered_column: None,
            turnout_column: None,
            excel_worksheet_name: None,
        };
        let voters = read_voter_records(&source).unwrap();
        assert_eq!(voters.len(), 2);
        assert_eq!(voters[1].county, "AB");
        assert_eq!(voters[1].registered, 800);
    }

    #[test]
    fn missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args();
        a.voters = Some(dir.path().join("nope.csv").display().to_string());
        a.trends = Some(dir.path().join("nope2.csv").display().to_string());
        a.out = Some("stdout".to_string());
        match run_analysis(&a).map_err(|e| *e) {
            Err(TrendsError::OpeningFile { .. }) => {}
            x => panic!("unexpected result {:?}", x),
        }
    }
}
