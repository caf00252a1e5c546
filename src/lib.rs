pub mod api;
pub mod commands;
pub mod config;
pub mod database;
pub mod gamification;
pub mod genetics;
pub mod llm;
pub mod profile;
pub mod providers;
pub mod state;

pub use genetics::{AnalysisResult, GeneticAnalyzer};
pub use profile::UserProfile;
pub use state::AppState;
