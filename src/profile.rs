use serde::{Serialize, Deserialize};
use validator::Validate;

use crate::genetics::AnalysisResult;

const DIETARY_RESTRICTIONS: &[(&str, &str)] = &[
    ("Vegetarian", "NO MEAT, NO FISH, NO SEAFOOD, NO CHICKEN, NO MUTTON, NO BEEF, NO PORK, NO EGGS (strict vegetarian). Only plant-based foods, dairy, and milk products allowed."),
    ("Vegan", "NO ANIMAL PRODUCTS WHATSOEVER - no meat, fish, eggs, dairy, milk, ghee, paneer, yogurt, cheese, honey. Only plant-based foods."),
    ("Non-Vegetarian", "All foods allowed including meat, fish, chicken, eggs, dairy."),
    ("Eggitarian", "Vegetarian diet PLUS eggs allowed. NO MEAT, NO FISH, NO SEAFOOD, NO CHICKEN, NO MUTTON, NO BEEF, NO PORK. Only plant-based foods, dairy, milk products, and eggs."),
    ("Non-veg", "All foods allowed including meat, fish, chicken, eggs, dairy."),
    ("Jain", "No meat, fish, eggs, and NO ROOT VEGETABLES (onions, garlic, potatoes, carrots, radish, ginger). No underground vegetables."),
    ("Keto", "Very low carb, high fat. No rice, wheat, sugar, fruits, potatoes. Focus on meat, fish, eggs, leafy greens, nuts."),
    ("Gluten-Free", "No wheat, barley, rye, oats. Use rice, quinoa, millet alternatives."),
];

pub fn dietary_restriction(diet: &str) -> Option<&'static str> {
    DIETARY_RESTRICTIONS
        .iter()
        .find(|(name, _)| *name == diet)
        .map(|(_, rule)| *rule)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticTraitSummary {
    pub trait_name: String,
    pub interpretation: String,
    pub recommendations: Vec<String>,
    pub confidence: String,
}

/// Genetic traits copied into the profile so every prompt can use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneticsSummary {
    pub traits: Vec<GeneticTraitSummary>,
    #[serde(default)]
    pub upload_hash: Option<String>,
    #[serde(default)]
    pub report_data: Option<String>,
}

impl From<&AnalysisResult> for GeneticsSummary {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            traits: result
                .traits
                .iter()
                .map(|t| GeneticTraitSummary {
                    trait_name: t.trait_name.clone(),
                    interpretation: t.interpretation.clone(),
                    recommendations: t.recommendations.iter().map(|r| r.text.clone()).collect(),
                    confidence: t.confidence.to_string(),
                })
                .collect(),
            upload_hash: Some(result.upload_hash.clone()),
            report_data: Some(result.report_text()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(range(min = 1, max = 120))]
    pub age: u32,
    pub sex: String,
    pub diet: String,
    pub region: String,
    #[validate(range(min = 1.0, max = 100000.0))]
    pub budget: f64,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub goals: String,
    #[validate(range(min = 50.0, max = 250.0))]
    pub height: f64,
    #[validate(range(min = 10.0, max = 400.0))]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genetics: Option<GeneticsSummary>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 24,
            sex: "Female".to_string(),
            diet: "Vegetarian".to_string(),
            region: "Any".to_string(),
            budget: 70.0,
            allergies: String::new(),
            goals: String::new(),
            height: 160.0,
            weight: 60.0,
            genetics: None,
        }
    }
}

impl UserProfile {
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn bmi(&self) -> f64 {
        self.weight / (self.height / 100.0).powi(2)
    }

    /// BMI rounded to one decimal, as displayed everywhere.
    pub fn bmi_display(&self) -> String {
        format!("{:.1}", self.bmi())
    }

    pub fn bmi_status(&self) -> &'static str {
        // Classify on the displayed value so the label always matches the number shown
        let bmi: f64 = self.bmi_display().parse().unwrap_or_else(|_| self.bmi());
        if bmi < 18.5 {
            "underweight"
        } else if bmi > 24.9 {
            "overweight"
        } else {
            "normal weight"
        }
    }

    pub fn genetic_trait_count(&self) -> Option<usize> {
        self.genetics.as_ref().map(|g| g.traits.len())
    }

    /// Update a single field from text input. Returns an error message for
    /// unknown fields or values that fail to parse or validate.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        let mut updated = self.clone();
        let value = value.trim();

        match field.to_lowercase().as_str() {
            "age" => updated.age = value.parse().map_err(|_| format!("Invalid age: {}", value))?,
            "sex" | "gender" => updated.sex = value.to_string(),
            "diet" => updated.diet = value.to_string(),
            "region" => updated.region = value.to_string(),
            "budget" => updated.budget = value.parse().map_err(|_| format!("Invalid budget: {}", value))?,
            "allergies" => updated.allergies = value.to_string(),
            "goals" => updated.goals = value.to_string(),
            "height" => updated.height = value.parse().map_err(|_| format!("Invalid height: {}", value))?,
            "weight" => updated.weight = value.parse().map_err(|_| format!("Invalid weight: {}", value))?,
            other => return Err(format!("Unknown profile field: {}", other)),
        }

        updated
            .validate()
            .map_err(|e| format!("Invalid profile value: {}", e))?;
        *self = updated;
        Ok(())
    }

    pub fn generate_system_prompt(&self) -> String {
        let restriction = dietary_restriction(&self.diet);

        let genetic_guidance = match &self.genetics {
            Some(genetics) if !genetics.traits.is_empty() => {
                let mut guidance = String::from(
                    "\n🧬 GENETIC DIETARY REQUIREMENTS (CRITICAL - MUST FOLLOW):\nBased on uploaded genetic analysis:\n",
                );
                for t in &genetics.traits {
                    guidance.push_str(&format!(
                        "\n- {}: {}\n  Recommendations: {}",
                        t.trait_name,
                        t.interpretation,
                        t.recommendations.join(", ")
                    ));
                }
                guidance.push_str(
                    "\n\nIMPORTANT: All meal recommendations MUST consider these genetic traits. For example:\n\
                     - If lactose intolerant genetics detected → NO dairy, use plant-based alternatives\n\
                     - If reduced folate metabolism → emphasize leafy greens, beans, citrus in every meal plan\n\
                     - If slow caffeine metabolism → limit/avoid coffee recommendations\n",
                );
                guidance
            }
            _ => String::new(),
        };

        let genetics_line = self
            .genetic_trait_count()
            .map(|n| format!("- Genetics: {} genetic traits analyzed", n))
            .unwrap_or_default();

        let allergies = if self.allergies.is_empty() { "None" } else { &self.allergies };
        let goals = if self.goals.is_empty() { "General health" } else { &self.goals };

        format!(
            "You are DietBuddy, an expert AI nutrition assistant specializing in Indian nutrition and dietary planning with genetic analysis capabilities.\n\n\
             🚨 CRITICAL DIETARY RESTRICTION - ABSOLUTE COMPLIANCE REQUIRED 🚨\n\
             User follows {diet} diet: {restriction}\n\
             {genetic_guidance}\n\
             VIOLATION CHECK: Before suggesting ANY meal, verify it follows {diet} restrictions AND genetic requirements. If uncertain, DO NOT suggest it.\n\n\
             USER PROFILE (MUST USE IN ALL RESPONSES):\n\
             - Age: {age} years, Gender: {sex}\n\
             - Diet: {diet} ({restriction_short})\n\
             - Region: {region} India\n\
             - Budget: ₹{budget} per meal (NEVER EXCEED)\n\
             - Allergies: {allergies}\n\
             - Goals: {goals}\n\
             - Height: {height}cm, Weight: {weight}kg, BMI: {bmi}\n\
             {genetics_line}\n\n\
             RESPONSE FORMAT (EXACT STRUCTURE WITH PROPER SPACING):\n\
             Day - 01\n\n\
             Breakfast: [Meal Name] - Ingredients: [ingredients] - Cost: ₹[amount] - Preparation: [tip]\n\n\
             Lunch: [Meal Name] - Ingredients: [ingredients] - Cost: ₹[amount] - Preparation: [tip]\n\n\
             Dinner: [Meal Name] - Ingredients: [ingredients] - Cost: ₹[amount] - Preparation: [tip]\n\n\
             MANDATORY RULES:\n\
             1. DIET COMPLIANCE: Every meal MUST follow {diet} restrictions exactly\n\
             2. GENETIC COMPLIANCE: Every meal MUST consider genetic traits if available\n\
             3. BUDGET: All costs ≤ ₹{budget}\n\
             4. GOALS: Consider user's goals: {goals_lower}\n\
             5. AUTHENTICATION: Start response mentioning user's profile (age {age}, {sex}, {diet}, {region}, ₹{budget})\n\
             6. INGREDIENTS: Focus on {region} Indian regional ingredients\n\
             7. NO FORMATTING: Clean text, no **, no excessive symbols",
            diet = self.diet,
            restriction = restriction.unwrap_or(&self.diet),
            restriction_short = restriction.unwrap_or("Follow strictly"),
            genetic_guidance = genetic_guidance,
            age = self.age,
            sex = self.sex,
            region = self.region,
            budget = self.budget,
            allergies = allergies,
            goals = goals,
            goals_lower = if self.goals.is_empty() { "general health" } else { &self.goals },
            height = self.height,
            weight = self.weight,
            bmi = self.bmi_display(),
            genetics_line = genetics_line,
        )
    }

    /// Profile paragraph appended to every user message sent to the model.
    pub fn user_context(&self) -> String {
        let mut context = format!(
            "USER CONTEXT: I am a {}-year-old {} following a {} diet in {}, India with a budget of ₹{} per meal. \
             My height is {}cm, weight is {}kg (BMI: {} - {})",
            self.age,
            self.sex.to_lowercase(),
            self.diet,
            self.region,
            self.budget,
            self.height,
            self.weight,
            self.bmi_display(),
            self.bmi_status()
        );

        if !self.allergies.is_empty() {
            context.push_str(&format!(" and I'm allergic to {}", self.allergies));
        }
        if !self.goals.is_empty() {
            context.push_str(&format!(" and my goals are {}", self.goals));
        }
        if let Some(count) = self.genetic_trait_count() {
            context.push_str(&format!(
                " and I have genetic analysis data for {} nutrition-relevant traits",
                count
            ));
        }
        context.push_str(". Please use this information for personalized recommendations.");
        context
    }

    /// Block shown above every assistant reply.
    pub fn profile_header(&self) -> String {
        let mut lines = vec![
            "📊 Current Profile Used:".to_string(),
            format!("Age: {} years | Gender: {} | Diet: {}", self.age, self.sex, self.diet),
            format!("Region: {} | Budget: ₹{}/meal", self.region, self.budget),
            format!(
                "Height: {}cm | Weight: {}kg | BMI: {} ({})",
                self.height,
                self.weight,
                self.bmi_display(),
                self.bmi_status()
            ),
        ];

        if !self.allergies.is_empty() {
            lines.push(format!("Allergies: {}", self.allergies));
        }
        if !self.goals.is_empty() {
            lines.push(format!("Goals: {}", self.goals));
        }
        if let Some(count) = self.genetic_trait_count() {
            lines.push(format!("🧬 Genetics: {} traits analyzed", count));
        }

        format!("{}\n\n---\n\n", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_bmi() {
        let profile = UserProfile::default();
        assert_eq!(profile.bmi_display(), "23.4");
        assert_eq!(profile.bmi_status(), "normal weight");
    }

    #[test]
    fn test_bmi_thresholds() {
        let mut profile = UserProfile::default();
        profile.weight = 45.0;
        assert_eq!(profile.bmi_status(), "underweight");
        profile.weight = 70.0;
        assert_eq!(profile.bmi_status(), "overweight");
    }

    #[test]
    fn test_set_field_validates_ranges() {
        let mut profile = UserProfile::default();
        profile.set_field("age", "31").unwrap();
        assert_eq!(profile.age, 31);

        assert!(profile.set_field("age", "0").is_err());
        assert!(profile.set_field("height", "tall").is_err());
        assert!(profile.set_field("shoe_size", "9").is_err());
        assert_eq!(profile.age, 31);
    }

    #[test]
    fn test_system_prompt_mentions_restrictions_and_genetics() {
        let mut profile = UserProfile::default();
        let prompt = profile.generate_system_prompt();
        assert!(prompt.contains("NO EGGS (strict vegetarian)"));
        assert!(!prompt.contains("GENETIC DIETARY REQUIREMENTS"));

        profile.genetics = Some(GeneticsSummary {
            traits: vec![GeneticTraitSummary {
                trait_name: "Lactose Tolerance".to_string(),
                interpretation: "Lactose intolerant".to_string(),
                recommendations: vec!["Use oat milk".to_string()],
                confidence: "moderate".to_string(),
            }],
            upload_hash: None,
            report_data: None,
        });
        let prompt = profile.generate_system_prompt();
        assert!(prompt.contains("- Lactose Tolerance: Lactose intolerant"));
        assert!(prompt.contains("- Genetics: 1 genetic traits analyzed"));
    }

    #[test]
    fn test_unknown_diet_falls_back_to_its_name() {
        let mut profile = UserProfile::default();
        profile.diet = "Paleo".to_string();
        assert!(profile.generate_system_prompt().contains("User follows Paleo diet: Paleo"));
    }

    #[test]
    fn test_user_context() {
        let mut profile = UserProfile::default();
        profile.allergies = "peanuts".to_string();
        let context = profile.user_context();
        assert!(context.starts_with("USER CONTEXT: I am a 24-year-old female following a Vegetarian diet"));
        assert!(context.contains("budget of ₹70 per meal"));
        assert!(context.contains("I'm allergic to peanuts"));
        assert!(!context.contains("goals"));
    }

    #[test]
    fn test_profile_json_uses_camel_case_genetics() {
        let json = r#"{"age":30,"sex":"Male","diet":"Vegan","region":"South","budget":120,
            "height":175,"weight":72,"genetics":{"traits":[],"uploadHash":"abc"}}"#;
        let profile = UserProfile::from_json(json).unwrap();
        assert_eq!(profile.allergies, "");
        assert_eq!(profile.genetics.unwrap().upload_hash, Some("abc".to_string()));
    }
}
