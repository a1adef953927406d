//! IRL Quest CLI
//!
//! Command-line interface for IRL Quest - tasks, quests and AI-generated
//! quest suggestions.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use irlquest_core::models::{QuestChanges, TaskChanges};
use irlquest_core::view::TaskFilter;
use irlquest_core::{App, Config};

mod commands;
mod output;
mod prompt;

use commands::generate::GenerateOptions;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "irlquest")]
#[command(about = "IRL Quest - turn your to-do list into quests")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        email: String,
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change your username or password
    Profile {
        /// New username
        #[arg(short, long)]
        username: Option<String>,
        /// Prompt for a new password
        #[arg(short, long)]
        password: bool,
    },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage quests
    Quest {
        #[command(subcommand)]
        command: QuestCommands,
    },
    /// Generate a quest from free-form text
    Generate {
        /// What you need to get done
        text: String,
        /// Extra context for the generator
        #[arg(short, long)]
        context: Option<String>,
        /// Preferred difficulty
        #[arg(short, long)]
        difficulty: Option<i32>,
        /// Preferred theme (e.g. fantasy, sci-fi)
        #[arg(short, long)]
        theme: Option<String>,
        /// Your current level
        #[arg(short, long)]
        level: Option<i32>,
        /// Save the suggestion as a quest
        #[arg(short, long)]
        save: bool,
    },
    /// Rewrite a plain task as a game-flavoured one
    Enhance {
        /// The task to enhance
        text: String,
        /// Extra context for the generator
        #[arg(short, long)]
        context: Option<String>,
        /// Your current level
        #[arg(short, long)]
        level: Option<i32>,
    },
    /// Show level, progress and achievements
    Stats,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show server and session status
    Status,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Which tasks to show (all, active, completed)
        #[arg(short, long, default_value = "all")]
        filter: TaskFilter,
    },
    /// Create a task
    #[command(alias = "create")]
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a task
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        completed: Option<bool>,
    },
    /// Mark a task done, or not done
    Toggle { id: String },
    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum QuestCommands {
    /// List quests
    #[command(alias = "ls")]
    List {
        /// Easiest first
        #[arg(long)]
        by_difficulty: bool,
    },
    /// Create a quest
    #[command(alias = "create")]
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short = 'D', long)]
        difficulty: Option<i32>,
    },
    /// Change a quest
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short = 'D', long)]
        difficulty: Option<i32>,
    },
    /// Mark a quest complete
    Complete { id: String },
    /// Delete a quest
    #[command(alias = "rm")]
    Delete {
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, api_url, timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without a session
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let app = App::open_with_config(config)?;
    let result = run(&app, cli.command, &output).await;
    app.close()?;

    result
}

async fn run(app: &App, command: Commands, output: &Output) -> Result<()> {
    debug!("running command");
    match command {
        Commands::Login { username, password } => {
            commands::auth::login(app, username, password, output).await
        }
        Commands::Register {
            email,
            username,
            password,
        } => commands::auth::register(app, email, username, password, output).await,
        Commands::Logout => commands::auth::logout(app, output),
        Commands::Whoami => commands::auth::whoami(app, output).await,
        Commands::Profile { username, password } => {
            commands::auth::update_profile(app, username, password, output).await
        }
        Commands::Task { command } => handle_task_command(app, command, output).await,
        Commands::Quest { command } => handle_quest_command(app, command, output).await,
        Commands::Generate {
            text,
            context,
            difficulty,
            theme,
            level,
            save,
        } => {
            let options = GenerateOptions {
                context,
                difficulty,
                theme,
                level,
                save,
            };
            commands::generate::generate(app, text, options, output).await
        }
        Commands::Enhance {
            text,
            context,
            level,
        } => commands::generate::enhance(app, text, context, level, output).await,
        Commands::Stats => commands::stats::show(app, output).await,
        Commands::Status => commands::status::show(app, output),
        Commands::Config { .. } => unreachable!(), // Handled in main
    }
}

async fn handle_task_command(app: &App, command: TaskCommands, output: &Output) -> Result<()> {
    match command {
        TaskCommands::List { filter } => commands::task::list(app, filter, output).await,
        TaskCommands::Add { title, description } => {
            commands::task::add(app, title, description, output).await
        }
        TaskCommands::Update {
            id,
            title,
            description,
            completed,
        } => {
            let changes = TaskChanges {
                title,
                description,
                completed,
            };
            commands::task::update(app, id, changes, output).await
        }
        TaskCommands::Toggle { id } => commands::task::toggle(app, id, output).await,
        TaskCommands::Delete { id, force } => commands::task::delete(app, id, force, output).await,
    }
}

async fn handle_quest_command(app: &App, command: QuestCommands, output: &Output) -> Result<()> {
    match command {
        QuestCommands::List { by_difficulty } => {
            commands::quest::list(app, by_difficulty, output).await
        }
        QuestCommands::Add {
            title,
            description,
            difficulty,
        } => commands::quest::add(app, title, description, difficulty, output).await,
        QuestCommands::Update {
            id,
            title,
            description,
            difficulty,
        } => {
            let changes = QuestChanges {
                title,
                description,
                difficulty,
            };
            commands::quest::update(app, id, changes, output).await
        }
        QuestCommands::Complete { id } => commands::quest::complete(app, id, output).await,
        QuestCommands::Delete { id, force } => {
            commands::quest::delete(app, id, force, output).await
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Install the tracing subscriber when IRLQUEST_LOG is set
///
/// Logs go to the configured log file, or stderr when none is set.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("IRLQUEST_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "irlquest_core={},irlquest_cli={}",
        log_level, log_level
    ));

    match config.log_file {
        Some(ref log_path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };

            // Ignore error if already initialized
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();

            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
