use plan_my_dietary::api;
use plan_my_dietary::commands::CommandHandler;
use plan_my_dietary::config::AppConfig;
use plan_my_dietary::database::Database;
use plan_my_dietary::gamification::load_quiz_questions;
use plan_my_dietary::llm::ChatManager;
use plan_my_dietary::providers::create_provider;
use plan_my_dietary::state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use log::{info, warn};
use rustyline::error::ReadlineError;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tokio::net::TcpListener;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    api_key: Option<String>,

    /// openai, openrouter or deepseek
    #[arg(long)]
    provider: Option<String>,

    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(long)]
    api: bool,

    #[arg(long, default_value = "3000")]
    port: u16,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(provider) = &self.provider {
            config.provider = provider.to_lowercase();
            config.api_key = AppConfig::api_key_for(&config.provider);
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize colored output
    colored::control::set_override(true);

    // Load environment variables
    dotenv().ok();
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    let mut config = AppConfig::from_env();
    args.apply(&mut config);

    tokio::fs::create_dir_all(&config.data_dir).await?;
    let db = Database::new(config.database_path()).await?;
    info!("Opened store at {}", config.database_path().display());

    let state = AppState::load(db).await?;
    let chat = ChatManager::new(create_provider(&config.provider, config.api_key.clone())?);

    if args.api {
        run_api_server(args.port, state, chat).await
    } else {
        run_cli_mode(&config, state, chat).await
    }
}

async fn run_cli_mode(
    config: &AppConfig,
    state: AppState,
    chat: ChatManager,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let quiz_questions = match load_quiz_questions(&config.quiz_dir) {
        Ok(questions) => questions,
        Err(e) => {
            warn!("Could not load quiz questions: {}", e);
            Vec::new()
        }
    };

    match chat.model_info().await {
        Some(model) => println!("🤖 Using {} ({})", config.provider.cyan(), model.cyan()),
        None => println!("{}", "🤖 No API key configured, answering with local responses".yellow()),
    }

    let mut command_handler = CommandHandler::new(state, chat, quiz_questions);

    // Show initial help menu
    command_handler.handle_command("help").await?;

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        let prompt = if command_handler.awaiting_answer() { "❓ " } else { "👤 " };
        match rl.readline(prompt) {
            Ok(line) => {
                let input = line.trim();
                let _ = rl.add_history_entry(input);

                if let Err(e) = command_handler.handle_command(input).await {
                    println!("{}", e.red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

async fn run_api_server(
    port: u16,
    state: AppState,
    chat: ChatManager,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let app = api::create_api(state, chat);

    let listener = TcpListener::bind(&addr).await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    info!("API server listening on {}", addr);
    println!("Ready to accept connections on {}", addr.to_string().cyan());

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
