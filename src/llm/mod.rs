pub mod chat;
pub mod meal_plan;

pub use chat::{ChatManager, ChatMessage, QuickAction, Role};
pub use meal_plan::{parse_meal_plan, MealPlanDay, PlannedMeal};
