use chrono::Utc;
use log::{error, info};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::mapper::map_traits;
use super::parser::parse_genotype_csv;
use super::report::{AnalysisResult, ReportSnapshot};
use super::AnalysisError;
use crate::database::{keys, Database};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Raw bytes of an upload together with the name it was submitted under.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AnalysisError::Read(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self { name, bytes })
    }

    /// Checks applied where files enter the application: a `.csv` name and
    /// the upload size limit. The parser itself accepts any text.
    pub fn check_upload(&self) -> Result<(), AnalysisError> {
        if !self.name.to_lowercase().ends_with(".csv") {
            return Err(AnalysisError::UnsupportedFile(self.name.clone()));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AnalysisError::TooLarge(self.bytes.len()));
        }
        Ok(())
    }

    fn text(&self) -> Result<&str, AnalysisError> {
        std::str::from_utf8(&self.bytes)
            .map_err(|e| AnalysisError::Read(format!("{} is not valid UTF-8: {}", self.name, e)))
    }
}

/// Runs uploads through parse, map and assembly, and owns the current result.
#[derive(Clone)]
pub struct GeneticAnalyzer {
    db: Database,
    current: Arc<RwLock<Option<AnalysisResult>>>,
    // Held for the whole of an analysis so overlapping uploads run one after another
    upload_lock: Arc<Mutex<()>>,
}

impl GeneticAnalyzer {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            current: Arc::new(RwLock::new(None)),
            upload_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Restore the last persisted result, if any.
    pub async fn load(&self) -> Result<Option<AnalysisResult>, AnalysisError> {
        let saved: Option<AnalysisResult> = self.db.load_json(keys::ANALYSIS_RESULT).await?;
        *self.current.write().await = saved.clone();
        Ok(saved)
    }

    pub async fn current(&self) -> Option<AnalysisResult> {
        self.current.read().await.clone()
    }

    pub async fn analyze(&self, file: &UploadedFile) -> Result<AnalysisResult, AnalysisError> {
        let _guard = self.upload_lock.lock().await;

        match self.run_pipeline(file).await {
            Ok(result) => {
                info!(
                    "Analyzed {}: {} parsed, {} valid, {} invalid, {} traits",
                    file.name,
                    result.parsed_rows,
                    result.valid_rows,
                    result.invalid_rows,
                    result.traits.len()
                );
                Ok(result)
            }
            Err(e) => {
                error!("Genetic analysis of {} failed: {}", file.name, e);
                Err(e)
            }
        }
    }

    async fn run_pipeline(&self, file: &UploadedFile) -> Result<AnalysisResult, AnalysisError> {
        let parsed = parse_genotype_csv(file.text()?)?;
        let traits = map_traits(parsed.valid_rows());
        let result = AnalysisResult::assemble(&parsed, traits, &file.bytes, &file.name, Utc::now());

        // Nothing is stored unless the whole pipeline succeeded
        self.db.save_json(keys::ANALYSIS_RESULT, &result).await?;
        *self.current.write().await = Some(result.clone());

        Ok(result)
    }

    pub async fn clear(&self) -> Result<(), AnalysisError> {
        let _guard = self.upload_lock.lock().await;
        self.db.remove(keys::ANALYSIS_RESULT).await?;
        *self.current.write().await = None;
        info!("Cleared stored genetic analysis");
        Ok(())
    }

    /// Store a compact snapshot of the current result under a new report id.
    pub async fn save_snapshot(&self) -> Result<Option<ReportSnapshot>, AnalysisError> {
        let Some(result) = self.current().await else {
            return Ok(None);
        };

        let snapshot = ReportSnapshot::from_result(&result, Utc::now());
        self.db.save_json(&snapshot.storage_key(), &snapshot).await?;
        Ok(Some(snapshot))
    }

    pub async fn load_snapshot(&self, id: &str) -> Result<Option<ReportSnapshot>, AnalysisError> {
        let key = format!("{}{}", ReportSnapshot::KEY_PREFIX, id);
        Ok(self.db.load_json(&key).await?)
    }

    pub async fn snapshot_ids(&self) -> Result<Vec<String>, AnalysisError> {
        let keys = self.db.keys_with_prefix(ReportSnapshot::KEY_PREFIX).await?;
        Ok(keys
            .into_iter()
            .map(|k| k.trim_start_matches(ReportSnapshot::KEY_PREFIX).to_string())
            .collect())
    }
}
