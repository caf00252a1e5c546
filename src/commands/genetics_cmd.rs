use colored::Colorize;

use crate::genetics::{AnalysisResult, Confidence, UploadedFile};
use crate::llm::meal_plan::parse_meal_plan;
use crate::llm::ChatManager;
use crate::state::AppState;

pub async fn handle_command(input: &str, state: &mut AppState, chat: &ChatManager) -> Result<(), String> {
    let mut parts = input.splitn(2, ' ');
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match command.as_str() {
        "analyze" => analyze(arg, state).await,
        "report" => {
            match state.analyzer.current().await {
                Some(result) => print_report(&result),
                None => println!("No genetic analysis yet. Use: analyze <file.csv>"),
            }
            Ok(())
        }
        "clear" => {
            if arg.eq_ignore_ascii_case("chat") {
                state.clear_messages().await.map_err(|e| format!("Failed to clear chat: {}", e))?;
                println!("🧹 Chat history cleared");
            } else {
                state.clear_genetics().await.map_err(|e| e.to_string())?;
                println!("🧹 Genetic analysis cleared. You can upload a new file.");
            }
            Ok(())
        }
        "snapshot" => snapshot(arg, state).await,
        "mealplan" => meal_plan(state, chat).await,
        _ => Err("Unknown genetics command. Type 'help' for available commands.".to_string()),
    }
}

async fn analyze(path: &str, state: &mut AppState) -> Result<(), String> {
    if path.is_empty() {
        println!("Please specify a CSV file to analyze.");
        println!("Usage: analyze <file.csv>");
        return Ok(());
    }

    println!("🧬 Analyzing {}...", path.bright_yellow());

    let file = UploadedFile::from_path(path).await.map_err(|e| e.to_string())?;
    file.check_upload().map_err(|e| e.to_string())?;

    let result = state.analyze(&file).await.map_err(|e| e.to_string())?;
    println!("{}", "✅ Genetic analysis completed successfully!".green());
    print_report(&result);
    Ok(())
}

fn confidence_label(confidence: Confidence) -> colored::ColoredString {
    let label = confidence.to_string();
    match confidence {
        Confidence::High | Confidence::UserProvided => label.green(),
        Confidence::Moderate => label.yellow(),
        Confidence::Low => label.red(),
    }
}

pub fn print_report(result: &AnalysisResult) {
    println!("\n🧬 Genetic Analysis Report");
    if let Some(sample_id) = &result.sample_id {
        println!("  Sample: {}", sample_id.bright_cyan());
    }
    println!(
        "  Rows: {} parsed | {} valid | {} invalid",
        result.parsed_rows.to_string().cyan(),
        result.valid_rows.to_string().green(),
        result.invalid_rows.to_string().red()
    );
    println!("  Upload hash: {}", result.upload_hash.dimmed());
    println!(
        "  {} | mapping {} | {}",
        result.traceability.file_name,
        result.traceability.mapping_version,
        result.traceability.upload_time
    );

    if result.traits.is_empty() {
        println!("\n  No known nutrition traits were found in this file.");
    }

    for t in &result.traits {
        println!(
            "\n  {} ({})",
            t.trait_name.bright_yellow(),
            confidence_label(t.confidence)
        );
        println!("    {}", t.interpretation);
        println!("    SNPs: {}", t.supporting_snps.join(", "));
        for rec in &t.recommendations {
            println!("    • [{}] {}", rec.kind, rec.text);
        }
    }

    if !result.badges_awarded.is_empty() {
        println!("\n  🏅 Badges: {}", result.badges_awarded.join(", ").bright_magenta());
    }
    println!("\n  {}", result.disclaimer.italic());
    println!();
}

async fn snapshot(id: &str, state: &mut AppState) -> Result<(), String> {
    if id.is_empty() {
        match state.analyzer.save_snapshot().await.map_err(|e| e.to_string())? {
            Some(snapshot) => {
                println!("📦 Saved report {}", snapshot.id.bright_cyan());
                println!("  {}", snapshot.summary);
            }
            None => println!("No genetic analysis to snapshot. Use: analyze <file.csv>"),
        }
        return Ok(());
    }

    if id.eq_ignore_ascii_case("list") {
        let ids = state.analyzer.snapshot_ids().await.map_err(|e| e.to_string())?;
        if ids.is_empty() {
            println!("No saved reports.");
        }
        for id in ids {
            println!("  - {}", id);
        }
        return Ok(());
    }

    let snapshot = state
        .analyzer
        .load_snapshot(id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No saved report with id {}", id))?;
    println!("\n📦 Report {}", snapshot.id.bright_cyan());
    println!("  Hash: {}", snapshot.upload_hash);
    println!("  Created: {}", snapshot.generated_at);
    println!("  Traits: {}", snapshot.summary);
    Ok(())
}

async fn meal_plan(state: &mut AppState, chat: &ChatManager) -> Result<(), String> {
    let reply = state
        .request_meal_plan(chat)
        .await
        .map_err(|e| format!("Failed to generate meal plan: {}", e))?;

    let Some(reply) = reply else {
        println!("Please complete a genetic analysis first. Use: analyze <file.csv>");
        return Ok(());
    };

    match parse_meal_plan(&reply.content) {
        Some(days) => {
            println!("\n🍽️ Genetic Meal Plan");
            for day in days {
                println!("\n  {}", format!("Day {}", day.day).bright_yellow());
                for meal in day.meals {
                    println!(
                        "    {}: {} (₹{:.0})",
                        meal.meal_type.cyan(),
                        meal.name,
                        meal.cost
                    );
                    println!("      Ingredients: {}", meal.ingredients);
                    println!("      Preparation: {}", meal.preparation.dimmed());
                }
            }
            println!();
        }
        None => println!("{}", reply.content.truecolor(255, 236, 179)),
    }
    Ok(())
}
