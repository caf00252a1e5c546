use anyhow::Result;
use log::{info, warn};

use crate::database::{keys, Database};
use crate::gamification::{HealthTracker, QuizOutcome};
use crate::genetics::{AnalysisError, AnalysisResult, GeneticAnalyzer, UploadedFile};
use crate::llm::chat::{genetic_meal_plan_prompt, ChatManager, ChatMessage, QuickAction};
use crate::profile::{GeneticsSummary, UserProfile};

/// Everything a session owns: profile, chat history, progress and the
/// genetic analyzer. Every mutation is written back to the store.
pub struct AppState {
    db: Database,
    pub profile: UserProfile,
    pub messages: Vec<ChatMessage>,
    pub tracker: HealthTracker,
    pub analyzer: GeneticAnalyzer,
}

impl AppState {
    pub async fn load(db: Database) -> Result<Self> {
        let profile = db.load_json(keys::PROFILE).await?.unwrap_or_default();
        let messages = db.load_json(keys::MESSAGES).await?.unwrap_or_default();

        let mut tracker = HealthTracker::default();
        if let Some(points) = db.load_json(keys::HEALTH_POINTS).await? {
            tracker.health_points = points;
        }
        if let Some(level) = db.load_json(keys::LEVEL).await? {
            tracker.level = level;
        }
        if let Some(streak) = db.load_json(keys::STREAK).await? {
            tracker.streak = streak;
        }

        let analyzer = GeneticAnalyzer::new(db.clone());
        if let Err(e) = analyzer.load().await {
            warn!("Could not restore genetic analysis: {}", e);
        }

        Ok(Self {
            db,
            profile,
            messages,
            tracker,
            analyzer,
        })
    }

    pub async fn save(&self) -> Result<()> {
        self.db.save_json(keys::PROFILE, &self.profile).await?;
        self.db.save_json(keys::MESSAGES, &self.messages).await?;
        self.save_progress().await
    }

    async fn save_progress(&self) -> Result<()> {
        self.db.save_json(keys::HEALTH_POINTS, &self.tracker.health_points).await?;
        self.db.save_json(keys::LEVEL, &self.tracker.level).await?;
        self.db.save_json(keys::STREAK, &self.tracker.streak).await?;
        Ok(())
    }

    /// Credit points and persist progress. Returns true on a level-up.
    pub async fn award_points(&mut self, points: u32) -> Result<bool> {
        let levelled_up = self.tracker.add_points(points);
        if levelled_up {
            info!("Reached level {}", self.tracker.level);
        }
        self.save_progress().await?;
        Ok(levelled_up)
    }

    pub async fn send_message(&mut self, chat: &ChatManager, content: &str) -> Result<ChatMessage> {
        self.messages.push(ChatMessage::user(content));

        let reply = chat.respond(&self.profile, content).await;
        if let Some(points) = reply.points_awarded {
            self.tracker.add_points(points);
        }
        self.messages.push(reply.clone());

        self.save().await?;
        Ok(reply)
    }

    pub async fn quick_action(&mut self, chat: &ChatManager, action: &QuickAction) -> Result<ChatMessage> {
        let bonus = action.bonus_points();
        if bonus > 0 {
            self.award_points(bonus).await?;
        }
        let message = action.message(&self.profile);
        self.send_message(chat, &message).await
    }

    pub async fn record_quiz(&mut self, outcome: &QuizOutcome) -> Result<bool> {
        self.award_points(outcome.points()).await
    }

    /// Run an upload through the analyzer and copy the traits into the profile.
    pub async fn analyze(&mut self, file: &UploadedFile) -> Result<AnalysisResult, AnalysisError> {
        let result = self.analyzer.analyze(file).await?;
        self.attach_genetics(&result);
        // The analysis is already stored; a stale profile copy is refreshed on the next save
        if let Err(e) = self.db.save_json(keys::PROFILE, &self.profile).await {
            warn!("Analysis stored but saving the profile failed: {}", e);
        }
        Ok(result)
    }

    pub fn attach_genetics(&mut self, result: &AnalysisResult) {
        self.profile.genetics = Some(GeneticsSummary::from(result));
    }

    pub async fn clear_genetics(&mut self) -> Result<(), AnalysisError> {
        self.analyzer.clear().await?;
        self.profile.genetics = None;
        self.db.save_json(keys::PROFILE, &self.profile).await?;
        Ok(())
    }

    /// Back to the default profile. The stored analysis goes with it.
    pub async fn reset_profile(&mut self) -> Result<()> {
        self.profile = UserProfile::default();
        self.analyzer.clear().await?;
        self.db.save_json(keys::PROFILE, &self.profile).await?;
        Ok(())
    }

    /// Ask the assistant for a 7-day plan around the current analysis.
    /// Returns `None` when nothing has been analysed yet.
    pub async fn request_meal_plan(&mut self, chat: &ChatManager) -> Result<Option<ChatMessage>> {
        let Some(result) = self.analyzer.current().await else {
            return Ok(None);
        };
        let prompt = genetic_meal_plan_prompt(&result);
        Ok(Some(self.send_message(chat, &prompt).await?))
    }

    pub async fn clear_messages(&mut self) -> Result<()> {
        self.messages.clear();
        self.db.save_json(keys::MESSAGES, &self.messages).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::PARTICIPATION_POINTS;
    use crate::llm::chat::LOCAL_RESPONSE_POINTS;

    const CSV: &str = "rsid,chromosome,position,genotype\nrs4988235,2,136608646,GG\n";

    #[tokio::test]
    async fn test_state_round_trips_through_store() {
        let db = Database::in_memory().await.unwrap();
        let mut state = AppState::load(db.clone()).await.unwrap();
        assert_eq!(state.profile, UserProfile::default());
        assert_eq!(state.tracker, HealthTracker::default());

        state.profile.set_field("age", "31").unwrap();
        state.send_message(&ChatManager::new(None), "hello").await.unwrap();

        let restored = AppState::load(db).await.unwrap();
        assert_eq!(restored.profile.age, 31);
        assert_eq!(restored.messages.len(), 2);
        assert_eq!(restored.tracker.health_points, LOCAL_RESPONSE_POINTS);
    }

    #[tokio::test]
    async fn test_analyze_attaches_genetics() {
        let db = Database::in_memory().await.unwrap();
        let mut state = AppState::load(db).await.unwrap();

        state.analyze(&UploadedFile::new("dna.csv", CSV)).await.unwrap();
        let genetics = state.profile.genetics.as_ref().unwrap();
        assert_eq!(genetics.traits[0].trait_name, "Lactose Tolerance");

        state.clear_genetics().await.unwrap();
        assert!(state.profile.genetics.is_none());
        assert!(state.analyzer.current().await.is_none());
    }

    #[tokio::test]
    async fn test_quick_quiz_action_awards_bonus() {
        let db = Database::in_memory().await.unwrap();
        let mut state = AppState::load(db).await.unwrap();

        let action = QuickAction::parse("nutrition-quiz");
        state.quick_action(&ChatManager::new(None), &action).await.unwrap();
        assert_eq!(state.tracker.health_points, 20 + LOCAL_RESPONSE_POINTS);

        let outcome = QuizOutcome::Incorrect {
            points: PARTICIPATION_POINTS,
            correct: "Lemon".to_string(),
        };
        state.record_quiz(&outcome).await.unwrap();
        assert_eq!(state.tracker.health_points, 35);
    }

    #[tokio::test]
    async fn test_meal_plan_needs_analysis() {
        let db = Database::in_memory().await.unwrap();
        let mut state = AppState::load(db).await.unwrap();
        let chat = ChatManager::new(None);

        assert!(state.request_meal_plan(&chat).await.unwrap().is_none());

        state.analyze(&UploadedFile::new("dna.csv", CSV)).await.unwrap();
        let reply = state.request_meal_plan(&chat).await.unwrap();
        assert!(reply.is_some());
        assert!(state.messages[0].content.contains("Lactose"));
    }
}
