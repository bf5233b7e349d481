use crate::analysis::io_common::{resolve_path, simplify_file_name};
use crate::analysis::io_voters::VoterColumns;
use crate::analysis::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "analysisName")]
    pub analysis_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VoterFileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "countyColumn")]
    pub county_column: Option<String>,
    #[serde(rename = "registeredColumn")]
    pub registered_column: Option<String>,
    #[serde(rename = "turnoutColumn")]
    pub turnout_column: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum VoterProvider {
    Csv,
    Xlsx,
}

impl VoterFileSource {
    fn from_path(file_path: String) -> VoterFileSource {
        VoterFileSource {
            provider: None,
            file_path,
            county_column: None,
            registered_column: None,
            turnout_column: None,
            excel_worksheet_name: None,
        }
    }

    pub fn provider(&self) -> TrendsResult<VoterProvider> {
        match self.provider.as_deref() {
            None | Some("csv") => Ok(VoterProvider::Csv),
            Some("xlsx") => Ok(VoterProvider::Xlsx),
            Some(p) => UnknownProviderSnafu {
                provider: p.to_string(),
            }
            .fail(),
        }
    }

    /// The column names, with the defaults of the official voter roll for the ones not set.
    pub fn columns(&self) -> VoterColumns {
        let default_cols = VoterColumns::default();
        VoterColumns {
            county: self.county_column.clone().unwrap_or(default_cols.county),
            registered: self
                .registered_column
                .clone()
                .unwrap_or(default_cols.registered),
            turnout: self.turnout_column.clone().unwrap_or(default_cols.turnout),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TrendsFileSource {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRules {
    #[serde(rename = "missingValues")]
    pub missing_values: Option<String>,
}

impl AnalysisRules {
    pub fn missing_value_policy(&self) -> TrendsResult<MissingValuePolicy> {
        match self.missing_values.as_deref() {
            None => Ok(MissingValuePolicy::DEFAULT),
            Some("propagate") => Ok(MissingValuePolicy::Propagate),
            Some("exclude") => Ok(MissingValuePolicy::ExcludeRow),
            Some(p) => UnknownMissingValuePolicySnafu {
                policy: p.to_string(),
            }
            .fail(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "voterFileSource")]
    pub voter_file_source: VoterFileSource,
    #[serde(rename = "trendsFileSource")]
    pub trends_file_source: TrendsFileSource,
    #[serde(default)]
    pub rules: AnalysisRules,
}

impl AnalysisConfig {
    /// The name written in the summary. Unless configured, it is made of the names of both inputs.
    pub fn analysis_name(&self) -> String {
        match self.output_settings.analysis_name.clone() {
            Some(name) => name,
            None => format!(
                "{} / {}",
                simplify_file_name(&self.voter_file_source.file_path),
                simplify_file_name(&self.trends_file_source.file_path)
            ),
        }
    }
}

fn check_file_path(file_path: &str, section: &str) -> TrendsResult<()> {
    if file_path.trim().is_empty() {
        whatever!("{}: filePath is empty", section);
    }
    Ok(())
}

/// Reads a configuration file. The input paths are resolved against its directory.
pub fn read_config(path: &str) -> BTrendsResult<AnalysisConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    let mut config: AnalysisConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    check_file_path(&config.voter_file_source.file_path, "voterFileSource")?;
    check_file_path(&config.trends_file_source.file_path, "trendsFileSource")?;

    let root_p = Path::new(path).parent().unwrap_or_else(|| Path::new("."));
    debug!("read_config: root path: {:?}", root_p);
    config.voter_file_source.file_path = resolve_path(root_p, &config.voter_file_source.file_path);
    config.trends_file_source.file_path =
        resolve_path(root_p, &config.trends_file_source.file_path);
    if let Some(dir) = config.output_settings.output_directory.clone() {
        if !dir.is_empty() {
            config.output_settings.output_directory = Some(resolve_path(root_p, &dir));
        }
    }
    Ok(config)
}

/// Builds the configuration from the configuration file, if any, and the command line.
///
/// Options passed on the command line take precedence over the file.
pub fn assemble_config(args: &Args) -> BTrendsResult<AnalysisConfig> {
    let mut config = match args.config.clone() {
        Some(config_p) => {
            info!("Reading configuration {}", config_p);
            read_config(&config_p)?
        }
        None => {
            let voters_p = args.voters.clone().context(MissingInputSnafu {})?;
            let trends_p = args.trends.clone().context(MissingInputSnafu {})?;
            AnalysisConfig {
                output_settings: OutputSettings::default(),
                voter_file_source: VoterFileSource::from_path(voters_p),
                trends_file_source: TrendsFileSource {
                    file_path: trends_p,
                },
                rules: AnalysisRules::default(),
            }
        }
    };

    if let Some(voters_p) = args.voters.clone() {
        config.voter_file_source.file_path = voters_p;
    }
    if let Some(trends_p) = args.trends.clone() {
        config.trends_file_source.file_path = trends_p;
    }
    if let Some(provider) = args.voters_type.clone() {
        config.voter_file_source.provider = Some(provider);
    }
    if let Some(name) = args.excel_worksheet_name.clone() {
        config.voter_file_source.excel_worksheet_name = Some(name);
    }
    if let Some(policy) = args.missing_values.clone() {
        config.rules.missing_values = Some(policy);
    }
    Ok(config)
}

pub fn read_summary(path: String) -> BTrendsResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "outputSettings": {
            "analysisName": "Presidential election, first round",
            "outputDirectory": "output"
        },
        "voterFileSource": {
            "provider": "xlsx",
            "filePath": "presence_now.xlsx",
            "excelWorksheetName": "Prezenta",
            "countyColumn": "Județ"
        },
        "trendsFileSource": {
            "filePath": "geoMap.csv"
        },
        "rules": {
            "missingValues": "exclude"
        }
    }"#;

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
    fn parse_config() {
        let config: AnalysisConfig = serde_json::from_str(CONFIG).unwrap();
        assert_eq!(
            config.analysis_name(),
            "Presidential election, first round"
        );
        assert_eq!(config.voter_file_source.provider().unwrap(), VoterProvider::Xlsx);
        let cols = config.voter_file_source.columns();
        assert_eq!(cols.county, "Județ");
        assert_eq!(cols.turnout, "LP");
        assert_eq!(
            config.rules.missing_value_policy().unwrap(),
            MissingValuePolicy::ExcludeRow
        );
    }

    #[test]
    fn minimal_config() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{"voterFileSource": {"filePath": "a/voters.csv"}, "trendsFileSource": {"filePath": "b/geoMap.csv"}}"#,
        )
        .unwrap();
        assert_eq!(config.analysis_name(), "voters.csv / geoMap.csv");
        assert_eq!(config.voter_file_source.provider().unwrap(), VoterProvider::Csv);
        assert_eq!(config.voter_file_source.columns(), VoterColumns::default());
        assert_eq!(
            config.rules.missing_value_policy().unwrap(),
            MissingValuePolicy::Propagate
        );
        assert_eq!(config.output_settings.output_directory, None);
    }

    #[test]
    fn unknown_options() {
        let mut source = VoterFileSource::from_path("voters.ods".to_string());
        source.provider = Some("ods".to_string());
        assert!(matches!(
            source.provider(),
            Err(TrendsError::UnknownProvider { .. })
        ));
        let rules = AnalysisRules {
            missing_values: Some("zero".to_string()),
        };
        assert!(matches!(
            rules.missing_value_policy(),
            Err(TrendsError::UnknownMissingValuePolicy { .. })
        ));
    }

    #[test]
    fn read_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_p = dir.path().join("config.json");
        fs::write(&config_p, CONFIG).unwrap();
        let config = read_config(&config_p.display().to_string()).unwrap();
        assert_eq!(
            config.trends_file_source.file_path,
            dir.path().join("geoMap.csv").display().to_string()
        );
        assert_eq!(
            config.output_settings.output_directory,
            Some(dir.path().join("output").display().to_string())
        );
    }

    #[test]
    fn empty_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_p = dir.path().join("config.json");
        fs::write(
            &config_p,
            r#"{"voterFileSource": {"filePath": ""}, "trendsFileSource": {"filePath": "geoMap.csv"}}"#,
        )
        .unwrap();
        match read_config(&config_p.display().to_string()).map_err(|e| *e) {
            Err(TrendsError::Whatever { message, .. }) => {
                assert_eq!(message, "voterFileSource: filePath is empty")
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn command_line_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_p = dir.path().join("config.json");
        fs::write(&config_p, CONFIG).unwrap();
        let mut a = args();
        a.config = Some(config_p.display().to_string());
        a.trends = Some("/tmp/other.csv".to_string());
        a.missing_values = Some("propagate".to_string());
        a.excel_worksheet_name = Some("Sheet1".to_string());
        let config = assemble_config(&a).unwrap();
        assert_eq!(config.trends_file_source.file_path, "/tmp/other.csv");
        assert_eq!(
            config.voter_file_source.excel_worksheet_name,
            Some("Sheet1".to_string())
        );
        assert_eq!(
            config.rules.missing_value_policy().unwrap(),
            MissingValuePolicy::Propagate
        );
    }

    #[test]
    fn missing_input() {
        let mut a = args();
        a.voters = Some("voters.csv".to_string());
        match assemble_config(&a).map_err(|e| *e) {
            Err(TrendsError::MissingInput {}) => {}
            x => panic!("unexpected result {:?}", x),
        }
    }
}
