/*!

This is the long-form manual for `county_trends` and `trendcorr`.

## Input formats

Two files are needed: the voter roll and the search-interest export.

### Voter roll

A table with a header row. Three columns are read, by name:

| column                         | content                                   |
|--------------------------------|-------------------------------------------|
| `Judet`                        | the county: a code (`CJ`) or a name       |
| `Înscriși pe liste permanente` | the number of registered voters           |
| `LP`                           | the number of voters who turned out       |

Other columns are ignored. The names can be changed in the configuration
file (`countyColumn`, `registeredColumn`, `turnoutColumn`). A county usually
spans many lines (one per polling station): they are summed. A cell that is
empty or not a count adds 0. If one of the three columns is missing from the
header, the analysis stops with an error.

Two providers are supported:
* `csv` Comma Separated Values (the default)
* `xlsx` an Excel workbook; the first worksheet is read unless
  `excelWorksheetName` (or `--excel-worksheet-name`) names another one.

### Search-interest export

The geographic export of the search-interest tool. It starts with a few
descriptive lines, then a header line that begins with `Regiune,`:

```text
Categorie: Toate categoriile

Regiune,Nicusor dan: (04.04.2025 – 04.05.2025),Crin Antonescu: (04.04.2025 – 04.05.2025),George Simion: (04.04.2025 – 04.05.2025),Victor Ponta: (04.04.2025 – 04.05.2025)
Județul Cluj,10 %,20 %,30 %,40 %
Municipiul București,12 %,,35 %,18 %
```

The candidate columns are recognized by their full label, date range
included. The `Județul ` and `Municipiul ` prefixes are removed from the
county names. A blank cell, or one that does not read as a number, is a
missing value: it is not counted as zero. A line with fewer cells than the
header is skipped.

If no line begins with `Regiune,` the export is considered empty: the
analysis still runs and reports no county and a correlation of 0 for every
candidate.

## Joining

Each county of the export is looked up by its exact name (diacritics
included) in a fixed table of the 41 counties and București, then matched with
the turnout of the same code. Counties found in only one of the two files are
left out.

## Correlation

For every candidate, the Pearson coefficient between the turnout percentage
and the search interest is computed over the joined counties. It is 0 when
there is no county, or when either series is constant.

A county that lacks a value for a candidate is handled according to the
missing-value policy:
* `propagate` (default) the coefficient of that candidate is not a number
  (`null` in the summary, `undefined` strength)
* `exclude` the county is left out of that candidate's computation only

A coefficient above 0.2 is reported as a `positive` correlation, below -0.2
as `negative`, and `weak` otherwise.

## Configuration

```json
{
  "outputSettings": { "analysisName": "Turul 1", "outputDirectory": "out" },
  "voterFileSource": { "provider": "csv", "filePath": "presence_now.csv" },
  "trendsFileSource": { "filePath": "geoMap.csv" },
  "rules": { "missingValues": "exclude" }
}
```

Paths are relative to the directory of the configuration file. The command
line options `--voters`, `--trends`, `--voters-type`, `--missing-values` and
`--out` take precedence over the file.

*/
