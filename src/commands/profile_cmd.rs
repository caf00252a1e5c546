use colored::Colorize;

use crate::profile::UserProfile;
use crate::state::AppState;

pub async fn handle_command(input: &str, state: &mut AppState) -> Result<(), String> {
    let args: Vec<&str> = input.split_whitespace().skip(1).collect();

    match args.as_slice() {
        [] => {
            print_profile(&state.profile);
            Ok(())
        }
        ["reset"] => {
            state
                .reset_profile()
                .await
                .map_err(|e| format!("Failed to reset profile: {}", e))?;
            println!("🔄 Profile reset to defaults. Stored genetic analysis removed.");
            Ok(())
        }
        ["set"] | ["set", _] => {
            println!("Please specify a field and a value.");
            println!("Usage: profile set <field> <value>");
            println!("Fields: age, sex, diet, region, budget, allergies, goals, height, weight");
            Ok(())
        }
        ["set", field, value @ ..] => {
            state.profile.set_field(field, &value.join(" "))?;
            state
                .save()
                .await
                .map_err(|e| format!("Failed to save profile: {}", e))?;
            println!("✅ Updated {}", field.bright_yellow());
            Ok(())
        }
        _ => Err("Unknown profile command. Usage: profile | profile set <field> <value> | profile reset".to_string()),
    }
}

fn print_profile(profile: &UserProfile) {
    println!("\n👤 Your Profile:");
    println!("  Age: {}", profile.age.to_string().cyan());
    println!("  Sex: {}", profile.sex.cyan());
    println!("  Diet: {}", profile.diet.cyan());
    println!("  Region: {}", profile.region.cyan());
    println!("  Budget: ₹{} per meal", profile.budget.to_string().cyan());
    println!("  Height: {} cm | Weight: {} kg", profile.height, profile.weight);
    println!("  BMI: {} ({})", profile.bmi_display().bright_yellow(), profile.bmi_status());
    if !profile.allergies.is_empty() {
        println!("  Allergies: {}", profile.allergies.red());
    }
    if !profile.goals.is_empty() {
        println!("  Goals: {}", profile.goals.green());
    }
    match profile.genetic_trait_count() {
        Some(count) => println!("  Genetics: {} traits analyzed", count.to_string().green()),
        None => println!("  Genetics: {}", "not analyzed".dimmed()),
    }
    println!();
}
