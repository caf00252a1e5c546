pub mod analyzer;
pub mod genotype;
pub mod mapper;
pub mod parser;
pub mod reference;
pub mod report;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::database::DatabaseError;

pub use analyzer::{GeneticAnalyzer, UploadedFile, MAX_UPLOAD_BYTES};
pub use mapper::map_traits;
pub use parser::{parse_genotype_csv, GenotypeRecord, ParsedGenotypes};
pub use report::{AnalysisResult, ReportSnapshot, Traceability};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("CSV file must contain headers and at least one data row")]
    NotEnoughRows,
    #[error("Missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),
    #[error("Failed to read file: {0}")]
    Read(String),
    #[error("File is too large ({0} bytes). Maximum upload size is 5MB")]
    TooLarge(usize),
    #[error("Only .csv files are supported: {0}")]
    UnsupportedFile(String),
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Moderate,
    High,
    UserProvided,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "low",
            Confidence::Moderate => "moderate",
            Confidence::High => "high",
            Confidence::UserProvided => "user_provided",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Diet,
    Supplement,
    Lifestyle,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecommendationKind::Diet => "diet",
            RecommendationKind::Supplement => "supplement",
            RecommendationKind::Lifestyle => "lifestyle",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub text: String,
    pub confidence: Confidence,
}

/// A trait derived from one or more genotype observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitInterpretation {
    pub trait_name: String,
    pub supporting_snps: Vec<String>,
    pub interpretation: String,
    pub recommendations: Vec<Recommendation>,
    pub confidence: Confidence,
}
