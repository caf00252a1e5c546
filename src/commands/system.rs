use colored::Colorize;

pub fn handle_command(input: &str) -> Result<(), String> {
    match input.to_lowercase().as_str() {
        "help" => {
            println!("\n🥗 {}", "Plan My Dietary".bright_green());
            println!("  Just type your nutrition question to chat with DietBuddy");
            println!("  Examples:");
            println!("    - what should I eat for breakfast on a ₹50 budget?");
            println!("    - suggest iron-rich vegetarian foods");
            println!();

            println!("🧬 Genetics Commands:");
            println!("  analyze <file.csv>   - Analyze a genotype CSV file");
            println!("  report               - Show the current genetic report");
            println!("  clear                - Remove the stored genetic analysis");
            println!("  clear chat           - Clear the chat history");
            println!("  snapshot             - Save the current report under a report id");
            println!("  snapshot list        - List saved report ids");
            println!("  snapshot <id>        - Show a saved report");
            println!("  mealplan             - Generate a 7-day plan from your genetics");
            println!();

            println!("👤 Profile Commands:");
            println!("  profile                      - Show your profile");
            println!("  profile set <field> <value>  - Update a profile field");
            println!("  profile reset                - Restore the default profile");
            println!("  Example: profile set diet Vegan");
            println!();

            println!("🏆 Progress Commands:");
            println!("  points        - Show health points, level and streak");
            println!("  achievements  - Show achievements");
            println!("  quiz          - Answer a nutrition quiz question");
            println!();

            println!("⚡ Quick Actions:");
            println!("  quick 3-day-plan     - Plan three days of meals");
            println!("  quick anemia-screen  - Anemia self-screen with local foods");
            println!("  quick nutrition-quiz - Start a quiz (+20 points)");
            println!("  quick genetic-diet   - Diet advice from your genetics");
            println!();

            println!("⚙️ System Commands:");
            println!("  help  - Show this help menu");
            println!("  exit  - Exit the program");
            Ok(())
        },
        "exit" | "quit" => {
            println!("👋 Goodbye!");
            std::process::exit(0);
        },
        _ => Err("Unknown system command. Type 'help' for available commands.".to_string())
    }
}
