use anyhow::{Context, Result};
use log::warn;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const POINTS_PER_LEVEL: u32 = 100;
pub const PARTICIPATION_POINTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthTracker {
    pub health_points: u32,
    pub level: u32,
    pub streak: u32,
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self {
            health_points: 0,
            level: 1,
            streak: 1,
        }
    }
}

impl HealthTracker {
    pub fn level_for(points: u32) -> u32 {
        points / POINTS_PER_LEVEL + 1
    }

    /// Add points and return true if a new level was reached.
    pub fn add_points(&mut self, points: u32) -> bool {
        self.health_points = self.health_points.saturating_add(points);
        let level = Self::level_for(self.health_points);
        let levelled_up = level > self.level;
        self.level = level;
        levelled_up
    }

    pub fn level_progress(&self) -> u32 {
        self.health_points % POINTS_PER_LEVEL
    }

    pub fn points_to_next_level(&self) -> u32 {
        POINTS_PER_LEVEL - self.level_progress()
    }

    pub fn achievements(&self) -> Vec<AchievementStatus> {
        Achievement::ALL.iter().map(|a| a.status(self)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstConversation,
    QuizMaster,
    StreakKeeper,
    HealthChampion,
    NutritionExpert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub unlocked: bool,
    pub progress: Option<(u32, u32)>,
}

impl Achievement {
    pub const ALL: [Achievement; 5] = [
        Achievement::FirstConversation,
        Achievement::QuizMaster,
        Achievement::StreakKeeper,
        Achievement::HealthChampion,
        Achievement::NutritionExpert,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::FirstConversation => "First Conversation",
            Achievement::QuizMaster => "Quiz Master",
            Achievement::StreakKeeper => "Streak Keeper",
            Achievement::HealthChampion => "Health Champion",
            Achievement::NutritionExpert => "Nutrition Expert",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstConversation => "Started your first chat with the nutrition assistant",
            Achievement::QuizMaster => "Completed 5 nutrition quizzes",
            Achievement::StreakKeeper => "Maintained a 7-day learning streak",
            Achievement::HealthChampion => "Reached 500 health points",
            Achievement::NutritionExpert => "Reached level 10",
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Achievement::FirstConversation => 10,
            Achievement::QuizMaster => 50,
            Achievement::StreakKeeper => 100,
            Achievement::HealthChampion => 0,
            Achievement::NutritionExpert => 200,
        }
    }

    pub fn status(&self, tracker: &HealthTracker) -> AchievementStatus {
        let (unlocked, progress) = match self {
            Achievement::FirstConversation => (tracker.health_points > 0, None),
            // Quiz completions are not counted separately; progress is estimated from points
            Achievement::QuizMaster => (false, Some(((tracker.health_points / 20).min(5), 5))),
            Achievement::StreakKeeper => (tracker.streak >= 7, Some((tracker.streak.min(7), 7))),
            Achievement::HealthChampion => {
                (tracker.health_points >= 500, Some((tracker.health_points.min(500), 500)))
            }
            Achievement::NutritionExpert => (tracker.level >= 10, Some((tracker.level.min(10), 10))),
        };

        AchievementStatus {
            achievement: *self,
            unlocked,
            progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
    pub explanation: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    Correct { points: u32 },
    Incorrect { points: u32, correct: String },
}

impl QuizOutcome {
    pub fn points(&self) -> u32 {
        match self {
            QuizOutcome::Correct { points } | QuizOutcome::Incorrect { points, .. } => *points,
        }
    }
}

impl QuizQuestion {
    pub fn grade(&self, answer: &str) -> QuizOutcome {
        if answer == self.correct {
            QuizOutcome::Correct { points: self.points }
        } else {
            QuizOutcome::Incorrect {
                points: PARTICIPATION_POINTS,
                correct: self.correct.clone(),
            }
        }
    }

    /// Resolve an answer typed as an option number (1-based) or as the option text.
    pub fn resolve_answer<'a>(&'a self, input: &'a str) -> &'a str {
        let input = input.trim();
        input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
            .unwrap_or(input)
    }
}

/// Load every `*.json` question file in a directory. Each file holds either
/// a single question or an array of them. Unreadable files are skipped.
pub fn load_quiz_questions<P: AsRef<Path>>(dir: P) -> Result<Vec<QuizQuestion>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut questions = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read quiz directory {}", dir.display()))?;
    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();

    for path in paths {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping quiz file {}: {}", path.display(), e);
                continue;
            }
        };

        if let Ok(batch) = serde_json::from_str::<Vec<QuizQuestion>>(&content) {
            questions.extend(batch);
        } else {
            match serde_json::from_str::<QuizQuestion>(&content) {
                Ok(question) => questions.push(question),
                Err(e) => warn!("Skipping quiz file {}: {}", path.display(), e),
            }
        }
    }

    Ok(questions)
}

pub fn pick_question(questions: &[QuizQuestion]) -> Option<&QuizQuestion> {
    questions.choose(&mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn question() -> QuizQuestion {
        QuizQuestion {
            id: 1,
            question: "Which food improves iron absorption when eaten with dal?".to_string(),
            options: vec!["Tea".to_string(), "Lemon".to_string()],
            correct: "Lemon".to_string(),
            explanation: "Vitamin C increases non-heme iron absorption.".to_string(),
            points: 20,
        }
    }

    #[test]
    fn test_level_is_points_over_hundred_plus_one() {
        let mut tracker = HealthTracker::default();
        assert_eq!(tracker.level, 1);
        assert!(!tracker.add_points(99));
        assert!(tracker.add_points(1));
        assert_eq!(tracker.level, 2);
        tracker.add_points(250);
        assert_eq!(tracker.level, 4);
        assert_eq!(tracker.level_progress(), 50);
        assert_eq!(tracker.points_to_next_level(), 50);
    }

    #[test]
    fn test_quiz_grading() {
        let q = question();
        assert_eq!(q.grade("Lemon"), QuizOutcome::Correct { points: 20 });
        assert_eq!(q.grade("Tea").points(), PARTICIPATION_POINTS);
        assert_eq!(q.resolve_answer("2"), "Lemon");
        assert_eq!(q.resolve_answer("Tea"), "Tea");
        assert_eq!(q.resolve_answer("7"), "7");
    }

    #[test]
    fn test_achievement_unlocks() {
        let mut tracker = HealthTracker::default();
        let unlocked = |t: &HealthTracker| {
            t.achievements().into_iter().filter(|s| s.unlocked).map(|s| s.achievement).collect::<Vec<_>>()
        };
        assert!(unlocked(&tracker).is_empty());

        tracker.add_points(10);
        assert_eq!(unlocked(&tracker), vec![Achievement::FirstConversation]);

        tracker.add_points(990);
        tracker.streak = 7;
        assert_eq!(
            unlocked(&tracker),
            vec![
                Achievement::FirstConversation,
                Achievement::StreakKeeper,
                Achievement::HealthChampion,
                Achievement::NutritionExpert,
            ]
        );
        assert_eq!(Achievement::QuizMaster.status(&tracker).progress, Some((5, 5)));
    }

    #[test]
    fn test_load_quiz_questions_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), serde_json::to_string(&question()).unwrap()).unwrap();
        fs::write(dir.path().join("b.json"), serde_json::to_string(&vec![question(), question()]).unwrap()).unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let questions = load_quiz_questions(dir.path()).unwrap();
        assert_eq!(questions.len(), 3);
        assert!(pick_question(&questions).is_some());
    }

    #[test]
    fn test_missing_quiz_directory_is_empty() {
        assert!(load_quiz_questions("/nonexistent/quizzes").unwrap().is_empty());
        assert!(pick_question(&[]).is_none());
    }
}
