use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::genetics::AnalysisResult;
use crate::profile::UserProfile;
use crate::providers::traits::CompletionProvider;

pub const AI_RESPONSE_POINTS: u32 = 20;
pub const LOCAL_RESPONSE_POINTS: u32 = 10;
pub const QUIZ_ACTION_POINTS: u32 = 20;

const LOCAL_RESPONSE: &str = "I'm your AI nutrition assistant, but I need an API key to provide detailed responses. Please add your API key to the configuration to get comprehensive nutrition advice tailored to your profile.\n\n\
For now, try exploring the other features like the nutrition quiz or the genetic analysis!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<u32>,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.to_string(),
            timestamp: Utc::now(),
            points_awarded: None,
        }
    }

    pub fn assistant(content: String, points_awarded: Option<u32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content,
            timestamp: Utc::now(),
            points_awarded,
        }
    }
}

/// Canned shortcuts offered next to the chat box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickAction {
    ThreeDayPlan,
    AnemiaScreen,
    NutritionQuiz,
    GeneticDiet,
    Custom(String),
}

impl QuickAction {
    pub fn parse(action: &str) -> Self {
        match action.trim() {
            "3-day-plan" => QuickAction::ThreeDayPlan,
            "anemia-screen" => QuickAction::AnemiaScreen,
            "nutrition-quiz" => QuickAction::NutritionQuiz,
            "genetic-diet" => QuickAction::GeneticDiet,
            other => QuickAction::Custom(other.to_string()),
        }
    }

    /// Points granted just for using the action, before any reply.
    pub fn bonus_points(&self) -> u32 {
        match self {
            QuickAction::NutritionQuiz => QUIZ_ACTION_POINTS,
            _ => 0,
        }
    }

    pub fn message(&self, profile: &UserProfile) -> String {
        match self {
            QuickAction::ThreeDayPlan => {
                let mut message = format!(
                    "Plan 3-day {} meals, {}, ₹{} per meal, 2100 kcal/day",
                    profile.diet.to_lowercase(),
                    profile.region,
                    profile.budget
                );
                if !profile.allergies.is_empty() {
                    message.push_str(&format!(", no {}", profile.allergies));
                }
                if !profile.goals.is_empty() {
                    message.push_str(&format!(", focusing on {}", profile.goals));
                }
                message.push('.');
                message
            }
            QuickAction::AnemiaScreen => {
                "Do a quick anemia self-screen and suggest tests/diet using local foods.".to_string()
            }
            QuickAction::NutritionQuiz => "I want to take a nutrition quiz to earn health points!".to_string(),
            QuickAction::GeneticDiet => "What diet should I follow based on my genetics?".to_string(),
            QuickAction::Custom(text) => text.clone(),
        }
    }
}

/// Prompt asking for a week-long plan built around analysed traits.
pub fn genetic_meal_plan_prompt(result: &AnalysisResult) -> String {
    let summary = result
        .traits
        .iter()
        .map(|t| format!("{}: {} (Confidence: {})", t.trait_name, t.interpretation, t.confidence))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Generate a comprehensive 7-day personalized meal plan based on my genetic analysis results: {}.\n\n\
         Please provide:\n\
         1. Daily meals (breakfast, lunch, dinner, snacks) for 7 days\n\
         2. Each meal should address my specific genetic traits\n\
         3. Include preparation tips and nutritional benefits\n\
         4. Consider my dietary preferences and restrictions from my profile\n\
         5. Stay within my budget constraints\n\
         6. Highlight which genetic traits each meal addresses\n\n\
         Make sure to create a detailed meal plan that I can follow immediately.",
        summary
    )
}

/// Turns a user message plus the current profile into an assistant reply.
pub struct ChatManager {
    provider: Option<Box<dyn CompletionProvider + Send + Sync>>,
}

impl ChatManager {
    pub fn new(provider: Option<Box<dyn CompletionProvider + Send + Sync>>) -> Self {
        Self { provider }
    }

    pub async fn model_info(&self) -> Option<String> {
        match &self.provider {
            Some(provider) => provider.get_model_info().await.ok(),
            None => None,
        }
    }

    /// Produce the assistant message for `content`. Provider failures are
    /// folded into the reply text rather than returned as errors.
    pub async fn respond(&self, profile: &UserProfile, content: &str) -> ChatMessage {
        let (body, points) = match &self.provider {
            Some(provider) => {
                let system_prompt = profile.generate_system_prompt();
                let prompt = format!("{}\n\n{}", content, profile.user_context());

                let body = match provider.complete(&system_prompt, &prompt).await {
                    Ok(text) => {
                        info!("Received completion ({} words)", text.split_whitespace().count());
                        text
                    }
                    Err(e) => {
                        error!("Chat completion failed: {}", e);
                        format!(
                            "I encountered an error connecting to the AI service: {}. Please check your API key and try again.\n\n{}",
                            e, LOCAL_RESPONSE
                        )
                    }
                };
                (body, AI_RESPONSE_POINTS)
            }
            None => (LOCAL_RESPONSE.to_string(), LOCAL_RESPONSE_POINTS),
        };

        ChatMessage::assistant(format!("{}{}", profile.profile_header(), body), Some(points))
    }
}
