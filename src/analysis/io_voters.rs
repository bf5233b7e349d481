// Readers for the voter roll.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use csv::{ReaderBuilder, Trim};

use crate::analysis::{
    io_common::{count_from_f64, parse_count, simplify_file_name, strip_bom},
    *,
};

/// The names of the columns read from the voter roll.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoterColumns {
    pub county: String,
    pub registered: String,
    pub turnout: String,
}

impl Default for VoterColumns {
    fn default() -> Self {
        VoterColumns {
            county: "Judet".to_string(),
            registered: "Înscriși pe liste permanente".to_string(),
            turnout: "LP".to_string(),
        }
    }
}

// Positions of the county, registered and turnout columns.
type ColumnIndexes = (usize, usize, usize);

fn column_indexes(header: &[String], columns: &VoterColumns) -> TrendsResult<ColumnIndexes> {
    let find = |name: &String| -> TrendsResult<usize> {
        header
            .iter()
            .position(|h| h == name)
            .context(MissingColumnSnafu {
                column: name.clone(),
                found: header.to_vec(),
            })
    };
    Ok((
        find(&columns.county)?,
        find(&columns.registered)?,
        find(&columns.turnout)?,
    ))
}

/// Parses the voter roll from CSV text.
///
/// The header is mandatory. Lines that cannot be read are skipped.
pub fn parse_voter_roll(text: &str, columns: &VoterColumns) -> BTrendsResult<Vec<VoterRecord>> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(strip_bom(text).as_bytes());
    let header: Vec<String> = rdr
        .headers()
        .context(CsvHeaderSnafu {})?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("parse_voter_roll: header: {:?}", header);
    let (county_idx, registered_idx, turnout_idx) = column_indexes(&header, columns)?;

    let mut res: Vec<VoterRecord> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = match line_r {
            Ok(line) => line,
            Err(e) => {
                debug!("parse_voter_roll: lineno {}: skipping: {}", lineno, e);
                continue;
            }
        };
        let cell = |i: usize| line.get(i).unwrap_or("");
        let record = VoterRecord {
            county: cell(county_idx).to_string(),
            registered: parse_count(cell(registered_idx)).unwrap_or(0),
            turned_out: parse_count(cell(turnout_idx)).unwrap_or(0),
        };
        res.push(record);
    }
    debug!("parse_voter_roll: {} records", res.len());
    Ok(res)
}

fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => "".to_string(),
    }
}

fn cell_count(cell: &DataType) -> Option<u64> {
    match cell {
        DataType::Int(i) if *i >= 0 => Some(*i as u64),
        DataType::Float(f) => count_from_f64(*f),
        DataType::String(s) => parse_count(s),
        _ => None,
    }
}

/// Reads the voter roll from an Excel workbook.
///
/// The first row is the header, with the same meaning as in the CSV file.
pub fn read_voter_roll_excel(
    path: &str,
    source: &VoterFileSource,
    columns: &VoterColumns,
) -> BTrendsResult<Vec<VoterRecord>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path.to_string(),
    })?;
    let wrange = match source.excel_worksheet_name.clone() {
        Some(name) => workbook
            .worksheet_range(name.as_str())
            .context(MissingWorksheetSnafu {
                name: name.clone(),
                path: path.to_string(),
            })?,
        None => workbook.worksheet_range_at(0).context(EmptyExcelSnafu {
            path: path.to_string(),
        })?,
    }
    .context(OpeningExcelSnafu {
        path: path.to_string(),
    })?;

    let mut rows = wrange.rows();
    let header: Vec<String> = rows
        .next()
        .map(|r| r.iter().map(cell_text).collect())
        .unwrap_or_default();
    debug!("read_voter_roll_excel: header: {:?}", header);
    let (county_idx, registered_idx, turnout_idx) = column_indexes(&header, columns)?;

    let file_name = simplify_file_name(path);
    let mut res: Vec<VoterRecord> = Vec::new();
    for (idx, row) in rows.enumerate() {
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            debug!("read_voter_roll_excel: {}: skipping empty row {}", file_name, idx + 2);
            continue;
        }
        res.push(VoterRecord {
            county: row.get(county_idx).map(cell_text).unwrap_or_default(),
            registered: row.get(registered_idx).and_then(cell_count).unwrap_or(0),
            turned_out: row.get(turnout_idx).and_then(cell_count).unwrap_or(0),
        });
    }
    debug!("read_voter_roll_excel: {}: {} records", file_name, res.len());
    Ok(res)
}
