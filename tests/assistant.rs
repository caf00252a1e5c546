use anyhow::{anyhow, Result};
use async_trait::async_trait;
use plan_my_dietary::database::{keys, Database};
use plan_my_dietary::genetics::UploadedFile;
use plan_my_dietary::llm::chat::{AI_RESPONSE_POINTS, LOCAL_RESPONSE_POINTS};
use plan_my_dietary::llm::{ChatManager, Role};
use plan_my_dietary::providers::traits::CompletionProvider;
use plan_my_dietary::state::AppState;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const SAMPLE: &str = "rsid,chromosome,position,genotype\nrs762551,15,75041917,CC\n";

#[derive(Clone)]
struct ScriptedProvider {
    reply: Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Arc::default(),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Arc::default(),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, system_prompt: &str, _prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(system_prompt.to_string());
        self.reply.clone().map_err(|e| anyhow!(e))
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok("scripted".to_string())
    }

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
        Box::new(self.clone())
    }
}

async fn load_state(dir: &TempDir) -> AppState {
    let db = Database::new(dir.path().join("store.db")).await.unwrap();
    AppState::load(db).await.unwrap()
}

#[tokio::test]
async fn test_message_without_provider_uses_local_reply() {
    let dir = TempDir::new().unwrap();
    let mut state = load_state(&dir).await;

    let reply = state.send_message(&ChatManager::new(None), "hello").await.unwrap();

    assert_eq!(reply.role, Role::Assistant);
    assert!(reply.content.contains("I need an API key"));
    assert_eq!(reply.points_awarded, Some(LOCAL_RESPONSE_POINTS));
    assert_eq!(state.tracker.health_points, LOCAL_RESPONSE_POINTS);
    assert_eq!(state.messages[0].role, Role::User);
}

#[tokio::test]
async fn test_failing_provider_still_replies() {
    let dir = TempDir::new().unwrap();
    let mut state = load_state(&dir).await;
    let chat = ChatManager::new(Some(Box::new(ScriptedProvider::failing("connection refused"))));

    let reply = state.send_message(&chat, "plan my dinner").await.unwrap();

    assert!(reply.content.contains("connection refused"));
    assert!(reply.content.contains("Please check your API key"));
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.tracker.health_points, AI_RESPONSE_POINTS);
}

#[tokio::test]
async fn test_genetics_reach_the_system_prompt() {
    let dir = TempDir::new().unwrap();
    let mut state = load_state(&dir).await;
    state.analyze(&UploadedFile::new("dna.csv", SAMPLE)).await.unwrap();

    let provider = ScriptedProvider::ok("Switch to decaf after noon.");
    let prompts = provider.prompts.clone();
    let chat = ChatManager::new(Some(Box::new(provider)));

    let reply = state.send_message(&chat, "Can I drink coffee?").await.unwrap();
    assert!(reply.content.ends_with("Switch to decaf after noon."));

    let system_prompt = prompts.lock().unwrap()[0].clone();
    assert!(system_prompt.contains("Caffeine Metabolism"));
}

#[tokio::test]
async fn test_reset_profile_removes_stored_analysis() {
    let dir = TempDir::new().unwrap();
    let mut state = load_state(&dir).await;
    state.profile.set_field("diet", "Vegan").unwrap();
    state.analyze(&UploadedFile::new("dna.csv", SAMPLE)).await.unwrap();

    state.reset_profile().await.unwrap();

    let reopened = load_state(&dir).await;
    assert_eq!(reopened.profile.diet, "Vegetarian");
    assert!(reopened.profile.genetics.is_none());
    assert!(reopened.analyzer.current().await.is_none());

    let db = Database::new(dir.path().join("store.db")).await.unwrap();
    assert!(db.get(keys::ANALYSIS_RESULT).await.unwrap().is_none());
}

#[tokio::test]
async fn test_progress_persists_between_sessions() {
    let dir = TempDir::new().unwrap();
    let mut state = load_state(&dir).await;
    let chat = ChatManager::new(None);

    for _ in 0..10 {
        state.send_message(&chat, "tip please").await.unwrap();
    }
    assert_eq!(state.tracker.health_points, 100);
    assert_eq!(state.tracker.level, 2);

    let reopened = load_state(&dir).await;
    assert_eq!(reopened.tracker.health_points, 100);
    assert_eq!(reopened.tracker.level, 2);
    assert_eq!(reopened.messages.len(), 20);
}

#[tokio::test]
async fn test_analysis_survives_profile_write_failure() {
    let dir = TempDir::new().unwrap();
    let mut state = load_state(&dir).await;

    // Reject any write to the profile key from a second connection
    let conn = tokio_rusqlite::Connection::open(dir.path().join("store.db")).await.unwrap();
    conn.call(|conn| {
        conn.execute_batch(
            "CREATE TRIGGER reject_profile_insert BEFORE INSERT ON local_storage
             WHEN NEW.key = 'planMyDietary_profile'
             BEGIN SELECT RAISE(ABORT, 'profile is read-only'); END;",
        )
    })
    .await
    .unwrap();

    let result = state.analyze(&UploadedFile::new("dna.csv", SAMPLE)).await.unwrap();
    assert_eq!(result.traits[0].trait_name, "Caffeine Metabolism");
    assert!(state.profile.genetics.is_some());

    let reopened = load_state(&dir).await;
    assert_eq!(reopened.analyzer.current().await.unwrap().upload_hash, result.upload_hash);
    assert!(reopened.profile.genetics.is_none());
}
