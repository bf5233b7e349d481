use clap::Parser;

/// Correlates the turnout of every county with the search interest for the candidates.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the analysis: input files, column names and rules.
    /// Relative paths in this file are resolved from its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The voter roll. Setting this option overrides the path that may be specified with
    /// the --config option.
    #[clap(long, value_parser)]
    pub voters: Option<String>,

    /// (default csv) The type of the voter roll: csv or xlsx.
    #[clap(long, value_parser)]
    pub voters_type: Option<String>,

    /// (default: first worksheet) When the voter roll is an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path) The search-interest export, with its header line starting with 'Regiune,'.
    #[clap(long, value_parser)]
    pub trends: Option<String>,

    /// (default propagate) What to do with counties missing the value of a candidate:
    /// 'propagate' makes the coefficient of that candidate undefined, 'exclude' leaves
    /// the county out of that candidate's computation.
    #[clap(long, value_parser)]
    pub missing_values: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the analysis will be written in JSON format
    /// to the given location. Otherwise it goes to the output directory of the configuration, or to the
    /// standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, trendcorr will check that the
    /// computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
