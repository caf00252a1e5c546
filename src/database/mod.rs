pub mod database;

pub use database::Database;
pub use database::DatabaseError;

/// Fixed keys the application persists under.
pub mod keys {
    pub const ANALYSIS_RESULT: &str = "geneticAnalysisResult";
    pub const PROFILE: &str = "planMyDietary_profile";
    pub const HEALTH_POINTS: &str = "planMyDietary_healthPoints";
    pub const LEVEL: &str = "planMyDietary_level";
    pub const STREAK: &str = "planMyDietary_streak";
    pub const MESSAGES: &str = "planMyDietary_messages";
}
