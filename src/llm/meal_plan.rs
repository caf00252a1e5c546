use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref DAY_PATTERN: Regex = Regex::new(r"(?i)Day\s*-\s*(\d+)").expect("valid day pattern");
    static ref MEAL_LABEL: Regex = Regex::new(r"(?i)(Breakfast|Lunch|Dinner|Snack):").expect("valid meal label pattern");
    static ref MEAL_PATTERN: Regex = Regex::new(
        r"(?is)^(Breakfast|Lunch|Dinner|Snack):\s*([^-]+?)\s*-\s*Ingredients:\s*([^-]+?)\s*-\s*Cost:\s*₹?(\d+(?:\.\d+)?)\s*-\s*Preparation:\s*(.+)$"
    )
    .expect("valid meal pattern");
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub meal_type: String,
    pub name: String,
    pub ingredients: String,
    pub cost: f64,
    pub preparation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanDay {
    pub day: u32,
    pub meals: Vec<PlannedMeal>,
}

/// Pull a structured day-by-day plan out of an assistant reply.
///
/// Returns `None` when the text has no `Day - NN` headings or none of the
/// days contain a meal line in the expected format.
pub fn parse_meal_plan(content: &str) -> Option<Vec<MealPlanDay>> {
    let headings: Vec<(usize, usize, u32)> = DAY_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let day = caps.get(1)?.as_str().parse().ok()?;
            Some((whole.start(), whole.end(), day))
        })
        .collect();

    if headings.is_empty() {
        return None;
    }

    let mut days = Vec::new();
    for (i, (_, body_start, day)) in headings.iter().enumerate() {
        let body_end = headings.get(i + 1).map(|(start, _, _)| *start).unwrap_or(content.len());
        let meals = parse_day_meals(&content[*body_start..body_end]);

        if !meals.is_empty() {
            days.push(MealPlanDay { day: *day, meals });
        }
    }

    if days.is_empty() {
        None
    } else {
        Some(days)
    }
}

fn parse_day_meals(section: &str) -> Vec<PlannedMeal> {
    let starts: Vec<usize> = MEAL_LABEL.find_iter(section).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .filter_map(|(i, start)| {
            let end = starts.get(i + 1).copied().unwrap_or(section.len());
            let mut entry = &section[*start..end];
            // A blank line ends the entry
            if let Some(blank) = entry.find("\n\n") {
                entry = &entry[..blank];
            }
            parse_meal(entry.trim())
        })
        .collect()
}

fn parse_meal(entry: &str) -> Option<PlannedMeal> {
    let caps = MEAL_PATTERN.captures(entry)?;

    Some(PlannedMeal {
        meal_type: caps[1].to_lowercase(),
        name: caps[2].trim().to_string(),
        ingredients: caps[3].trim().to_string(),
        cost: caps[4].parse().ok()?,
        preparation: caps[5].trim().to_string(),
    })
}
