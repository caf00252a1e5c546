use colored::Colorize;

use crate::gamification::{QuizOutcome, QuizQuestion};
use crate::state::AppState;

pub fn show_points(state: &AppState) {
    let tracker = &state.tracker;
    println!("\n🏆 Health Progress:");
    println!("  Points: {}", tracker.health_points.to_string().bright_yellow());
    println!("  Level: {}", tracker.level.to_string().bright_green());
    println!("  Streak: {} day(s)", tracker.streak.to_string().cyan());
    println!(
        "  Next level in {} points",
        tracker.points_to_next_level().to_string().cyan()
    );
    println!();
}

pub fn show_achievements(state: &AppState) {
    println!("\n🎖️ Achievements:");
    for status in state.tracker.achievements() {
        let marker = if status.unlocked { "✅" } else { "🔒" };
        let progress = status
            .progress
            .map(|(current, target)| format!(" ({}/{})", current, target))
            .unwrap_or_default();
        let title = if status.unlocked {
            status.achievement.title().green()
        } else {
            status.achievement.title().dimmed()
        };
        println!("  {} {}{} - {}", marker, title, progress, status.achievement.description());
    }
    println!();
}

pub fn ask_question(question: &QuizQuestion) {
    println!("\n❓ {}", question.question.bright_yellow());
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    println!("Answer with the option number or text ({} points).", question.points);
}

pub async fn answer_question(question: &QuizQuestion, input: &str, state: &mut AppState) -> Result<(), String> {
    let answer = question.resolve_answer(input);
    let outcome = question.grade(answer);

    match &outcome {
        QuizOutcome::Correct { points } => {
            println!("{} +{} points", "🎉 Correct!".green(), points);
        }
        QuizOutcome::Incorrect { points, correct } => {
            println!(
                "{} The answer is {}. +{} points for participating",
                "❌ Not quite.".red(),
                correct.bright_yellow(),
                points
            );
        }
    }
    println!("💡 {}", question.explanation);

    let levelled_up = state
        .record_quiz(&outcome)
        .await
        .map_err(|e| format!("Failed to save progress: {}", e))?;
    if levelled_up {
        println!("⬆️ Level up! You are now level {}", state.tracker.level.to_string().bright_green());
    }
    Ok(())
}
