use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::parser::ParsedGenotypes;
use super::reference::{DEFAULT_BADGES, DISCLAIMER, MAPPING_VERSION};
use super::TraitInterpretation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traceability {
    pub file_name: String,
    pub upload_time: String,
    pub mapping_version: String,
    pub hash: String,
}

/// Outcome of one genotype upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sample_id: Option<String>,
    pub upload_hash: String,
    pub parsed_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub traits: Vec<TraitInterpretation>,
    pub traceability: Traceability,
    pub badges_awarded: Vec<String>,
    pub disclaimer: String,
}

/// Hex-encoded SHA-256 of the raw upload.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::default();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

impl AnalysisResult {
    pub fn assemble(
        parsed: &ParsedGenotypes,
        traits: Vec<TraitInterpretation>,
        raw: &[u8],
        file_name: &str,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        let hash = content_hash(raw);
        let valid_rows = parsed.valid_rows().len();

        Self {
            sample_id: parsed.sample_id(),
            upload_hash: hash.clone(),
            parsed_rows: parsed.parsed_rows(),
            valid_rows,
            invalid_rows: parsed.parsed_rows() - valid_rows,
            traits,
            traceability: Traceability {
                file_name: file_name.to_string(),
                upload_time: uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                mapping_version: MAPPING_VERSION.to_string(),
                hash,
            },
            badges_awarded: DEFAULT_BADGES.iter().map(|b| b.to_string()).collect(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    /// One line per trait, used when the report is handed to the assistant.
    pub fn report_text(&self) -> String {
        self.traits
            .iter()
            .map(|t| {
                let recs: Vec<&str> = t.recommendations.iter().map(|r| r.text.as_str()).collect();
                format!(
                    "{}: {} ({} confidence) - Recommendations: {}",
                    t.trait_name,
                    t.interpretation,
                    t.confidence,
                    recs.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Short `Name=Word` pairs, the form stored alongside a report id.
    pub fn compact_summary(&self) -> String {
        self.traits
            .iter()
            .map(|t| {
                let short_name: String = t
                    .trait_name
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .take(8)
                    .collect();
                let first_word = t.interpretation.split(' ').next().unwrap_or_default();
                format!("{}={}", short_name, first_word)
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// A stored copy of an analysis keyed by a generated report id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub id: String,
    pub sample_id: Option<String>,
    pub upload_hash: String,
    pub traits: Vec<TraitInterpretation>,
    pub summary: String,
    pub generated_at: String,
}

impl ReportSnapshot {
    pub const KEY_PREFIX: &'static str = "genetic_report_";

    pub fn from_result(result: &AnalysisResult, now: DateTime<Utc>) -> Self {
        let hash_prefix: String = result.upload_hash.chars().take(8).collect();
        let millis = now.timestamp_millis().to_string();
        let suffix = &millis[millis.len().saturating_sub(4)..];

        Self {
            id: format!("GR{}{}", hash_prefix.to_uppercase(), suffix),
            sample_id: result.sample_id.clone(),
            upload_hash: result.upload_hash.clone(),
            traits: result.traits.clone(),
            summary: result.compact_summary(),
            generated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn storage_key(&self) -> String {
        format!("{}{}", Self::KEY_PREFIX, self.id)
    }
}
