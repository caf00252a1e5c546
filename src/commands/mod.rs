use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::gamification::{pick_question, QuizQuestion};
use crate::llm::{ChatManager, ChatMessage, QuickAction};
use crate::state::AppState;

mod genetics_cmd;
mod profile_cmd;
mod progress_cmd;
mod system;

pub use genetics_cmd::print_report;

pub struct CommandHandler {
    state: AppState,
    chat: ChatManager,
    quiz_questions: Vec<QuizQuestion>,
    // Set while the REPL waits for a quiz answer
    pending_quiz: Option<QuizQuestion>,
}

impl CommandHandler {
    pub fn new(state: AppState, chat: ChatManager, quiz_questions: Vec<QuizQuestion>) -> Self {
        Self {
            state,
            chat,
            quiz_questions,
            pending_quiz: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn awaiting_answer(&self) -> bool {
        self.pending_quiz.is_some()
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<(), String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }

        if let Some(question) = self.pending_quiz.take() {
            return progress_cmd::answer_question(&question, input, &mut self.state).await;
        }

        // Handle single-word commands first
        match input.to_lowercase().as_str() {
            "help" | "exit" | "quit" => return system::handle_command(input),
            "points" => {
                progress_cmd::show_points(&self.state);
                return Ok(());
            }
            "achievements" => {
                progress_cmd::show_achievements(&self.state);
                return Ok(());
            }
            "quiz" => return self.start_quiz(),
            _ => {}
        }

        let command = input.split_whitespace().next().unwrap_or_default().to_lowercase();
        match command.as_str() {
            "analyze" | "report" | "clear" | "snapshot" | "mealplan" => {
                genetics_cmd::handle_command(input, &mut self.state, &self.chat).await
            }
            "profile" => profile_cmd::handle_command(input, &mut self.state).await,
            "quick" => {
                let action = input.splitn(2, ' ').nth(1).unwrap_or_default().trim();
                self.handle_quick_action(action).await
            }
            // Default to chat if no command matches
            _ => self.handle_chat(input).await,
        }
    }

    fn start_quiz(&mut self) -> Result<(), String> {
        let question = pick_question(&self.quiz_questions)
            .cloned()
            .ok_or_else(|| "No quiz questions available. Add question files to the quiz directory.".to_string())?;
        progress_cmd::ask_question(&question);
        self.pending_quiz = Some(question);
        Ok(())
    }

    async fn handle_quick_action(&mut self, action: &str) -> Result<(), String> {
        if action.is_empty() {
            println!("Please specify an action.");
            println!("Usage: quick <3-day-plan | anemia-screen | nutrition-quiz | genetic-diet>");
            return Ok(());
        }

        let action = QuickAction::parse(action);
        let spinner = thinking_spinner();
        let reply = self
            .state
            .quick_action(&self.chat, &action)
            .await
            .map_err(|e| format!("Failed to save conversation: {}", e));
        spinner.finish_and_clear();

        self.print_reply(&reply?);

        if action == QuickAction::NutritionQuiz && !self.quiz_questions.is_empty() {
            self.start_quiz()?;
        }
        Ok(())
    }

    async fn handle_chat(&mut self, input: &str) -> Result<(), String> {
        let spinner = thinking_spinner();
        let reply = self
            .state
            .send_message(&self.chat, input)
            .await
            .map_err(|e| format!("Failed to save conversation: {}", e));
        spinner.finish_and_clear();

        self.print_reply(&reply?);
        Ok(())
    }

    fn print_reply(&self, reply: &ChatMessage) {
        println!("{}", reply.content.truecolor(255, 236, 179));

        if let Some(points) = reply.points_awarded {
            println!(
                "\n🏆 +{} health points | Total: {} | Level {}",
                points.to_string().cyan(),
                self.state.tracker.health_points.to_string().cyan(),
                self.state.tracker.level.to_string().cyan()
            );
        }
        println!();
    }
}

fn thinking_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("DietBuddy is thinking...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn question() -> QuizQuestion {
        QuizQuestion {
            id: 7,
            question: "Which millet is richest in calcium?".to_string(),
            options: vec!["Ragi".to_string(), "Bajra".to_string(), "Jowar".to_string()],
            correct: "Ragi".to_string(),
            explanation: "Ragi has around 344 mg calcium per 100 g.".to_string(),
            points: 15,
        }
    }

    async fn handler(questions: Vec<QuizQuestion>) -> CommandHandler {
        let db = Database::in_memory().await.unwrap();
        let state = AppState::load(db).await.unwrap();
        CommandHandler::new(state, ChatManager::new(None), questions)
    }

    #[tokio::test]
    async fn test_quiz_answer_is_graded() {
        let mut handler = handler(vec![question()]).await;

        handler.handle_command("quiz").await.unwrap();
        assert!(handler.awaiting_answer());

        handler.handle_command("1").await.unwrap();
        assert!(!handler.awaiting_answer());
        assert_eq!(handler.state().tracker.health_points, 15);
    }

    #[tokio::test]
    async fn test_quiz_without_questions_errors() {
        let mut handler = handler(Vec::new()).await;
        assert!(handler.handle_command("quiz").await.is_err());
    }

    #[tokio::test]
    async fn test_profile_and_chat_commands() {
        let mut handler = handler(Vec::new()).await;

        handler.handle_command("profile set diet Vegan").await.unwrap();
        assert_eq!(handler.state().profile.diet, "Vegan");
        assert!(handler.handle_command("profile set age 500").await.is_err());
        assert_eq!(handler.state().profile.age, 24);

        handler.handle_command("what is ragi?").await.unwrap();
        assert_eq!(handler.state().messages.len(), 2);

        handler.handle_command("profile reset").await.unwrap();
        assert_eq!(handler.state().profile.diet, "Vegetarian");
    }
}
