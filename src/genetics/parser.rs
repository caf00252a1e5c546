use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::genotype::{is_valid_genotype, normalize_genotype};
use super::AnalysisError;

pub const REQUIRED_HEADERS: [&str; 4] = ["rsid", "chromosome", "position", "genotype"];

/// Prefix every mappable variant identifier carries once upper-cased.
pub const RSID_PREFIX: &str = "RS";

/// One data row of an uploaded genotype file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeRecord {
    pub rsid: String,
    pub chromosome: String,
    pub position: String,
    pub genotype: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trait_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
}

impl GenotypeRecord {
    /// Whether the row can be handed to the trait mapper.
    pub fn is_valid(&self) -> bool {
        self.rsid.starts_with(RSID_PREFIX) && is_valid_genotype(&self.genotype)
    }

    /// User-supplied trait/interpretation pair, when both are present.
    pub fn user_trait(&self) -> Option<(&str, &str)> {
        match (&self.trait_name, &self.interpretation) {
            (Some(name), Some(interpretation)) => Some((name.as_str(), interpretation.as_str())),
            _ => None,
        }
    }
}

/// Rows retained from an upload plus the split between valid and invalid ones.
#[derive(Debug, Clone, Default)]
pub struct ParsedGenotypes {
    pub headers: Vec<String>,
    pub rows: Vec<GenotypeRecord>,
}

impl ParsedGenotypes {
    pub fn parsed_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn valid_rows(&self) -> Vec<&GenotypeRecord> {
        self.rows.iter().filter(|row| row.is_valid()).collect()
    }

    pub fn invalid_rows(&self) -> usize {
        self.parsed_rows() - self.valid_rows().len()
    }

    /// First non-empty `sample_id` found in the file, if the column exists.
    pub fn sample_id(&self) -> Option<String> {
        self.rows.iter().find_map(|row| row.sample_id.clone())
    }
}

/// Report which required columns are absent from a header row.
pub fn missing_headers(headers: &[String]) -> Vec<String> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    REQUIRED_HEADERS
        .iter()
        .filter(|required| !normalized.iter().any(|h| h == *required))
        .map(|required| required.to_string())
        .collect()
}

/// Parse the text of an uploaded genotype CSV.
///
/// Blank lines are discarded. The first remaining line is the header; rows
/// with fewer cells than the header are skipped without being counted.
pub fn parse_genotype_csv(text: &str) -> Result<ParsedGenotypes, AnalysisError> {
    // Spreadsheet "CSV UTF-8" exports start with a byte-order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(AnalysisError::NotEnoughRows);
    }

    let headers: Vec<String> = lines[0]
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let missing = missing_headers(&headers);
    if !missing.is_empty() {
        return Err(AnalysisError::MissingHeaders(missing));
    }

    let mut rows = Vec::new();
    for line in &lines[1..] {
        let values: Vec<&str> = line.split(',').map(|v| v.trim()).collect();

        if values.len() < headers.len() {
            continue;
        }

        let cells: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(values.iter().copied())
            .collect();

        rows.push(build_record(&cells));
    }

    log::debug!("Parsed {} genotype rows from {} lines", rows.len(), lines.len() - 1);

    Ok(ParsedGenotypes { headers, rows })
}

fn build_record(cells: &HashMap<&str, &str>) -> GenotypeRecord {
    let cell = |name: &str| cells.get(name).copied().unwrap_or_default().to_string();
    let optional = |name: &str| {
        cells
            .get(name)
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    };

    GenotypeRecord {
        rsid: cell("rsid").to_uppercase(),
        chromosome: cell("chromosome"),
        position: cell("position"),
        genotype: normalize_genotype(&cell("genotype")),
        trait_name: optional("trait"),
        interpretation: optional("interpretation"),
        sample_id: optional("sample_id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "rsid,chromosome,position,genotype\n\
                          rs4988235,2,136608646,GG\n\
                          rs762551,15,75041917,AA\n\
                          rs9999999,1,1,XY\n";

    #[test]
    fn test_parses_rows_and_counts_validity() {
        let parsed = parse_genotype_csv(SAMPLE).unwrap();
        assert_eq!(parsed.parsed_rows(), 3);
        assert_eq!(parsed.valid_rows().len(), 2);
        assert_eq!(parsed.invalid_rows(), 1);
        assert_eq!(parsed.rows[0].rsid, "RS4988235");
        assert_eq!(parsed.rows[2].genotype, "");
    }

    #[test]
    fn test_single_line_file_is_rejected() {
        let err = parse_genotype_csv("rsid,chromosome,position,genotype\n").unwrap_err();
        assert!(err.to_string().contains("headers and at least one data row"));

        let err = parse_genotype_csv("\n\n   \n").unwrap_err();
        assert!(matches!(err, AnalysisError::NotEnoughRows));
    }

    #[test]
    fn test_missing_headers_are_named() {
        let err = parse_genotype_csv("RSID,Position,foo\nrs1,1,AA\n").unwrap_err();
        match err {
            AnalysisError::MissingHeaders(missing) => {
                assert_eq!(missing, vec!["chromosome".to_string(), "genotype".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let text = "RSID, Chromosome ,POSITION,Genotype\nrs1801133,1,11856378,C/T\n";
        let parsed = parse_genotype_csv(text).unwrap();
        assert_eq!(parsed.rows[0].genotype, "CT");
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let text = "rsid,chromosome,position,genotype\nrs1,1\nrs762551,15,75041917,a\n";
        let parsed = parse_genotype_csv(text).unwrap();
        assert_eq!(parsed.parsed_rows(), 1);
        assert_eq!(parsed.rows[0].genotype, "AA");
    }

    #[test]
    fn test_optional_columns() {
        let text = "rsid,chromosome,position,genotype,trait,interpretation,sample_id\r\n\
                    rs1,1,1,AG,Bitter Taste,Super taster,\r\n\
                    rs2,1,2,AG,,,S-42\r\n";
        let parsed = parse_genotype_csv(text).unwrap();
        assert_eq!(parsed.rows[0].user_trait(), Some(("Bitter Taste", "Super taster")));
        assert_eq!(parsed.rows[1].user_trait(), None);
        assert_eq!(parsed.sample_id(), Some("S-42".to_string()));
    }

    #[test]
    fn test_non_rs_identifiers_are_invalid() {
        let text = "rsid,chromosome,position,genotype\ni3000001,1,1,AA\n";
        let parsed = parse_genotype_csv(text).unwrap();
        assert_eq!(parsed.valid_rows().len(), 0);
        assert_eq!(parsed.invalid_rows(), 1);
    }

    #[test]
    fn test_leading_byte_order_mark_is_ignored() {
        let text = "\u{feff}rsid,chromosome,position,genotype\nrs4988235,2,136608646,GG\n";
        let parsed = parse_genotype_csv(text).unwrap();
        assert_eq!(parsed.headers[0], "rsid");
        assert_eq!(parsed.parsed_rows(), 1);
        assert_eq!(parsed.valid_rows().len(), 1);
    }
}
