//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use irlquest_core::models::{GeneratedQuest, TaskEnhancement};
use irlquest_core::view::{ProfileStats, TaskSummary};
use irlquest_core::{Quest, Task, User};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if we may prompt the user
    pub fn is_interactive(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print a user profile
    pub fn print_user(&self, user: &User) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", user.id);
                println!("Username: {}", user.username);
                println!("Email:    {}", user.email);
                if let Some(level) = user.level {
                    println!("Level:    {}", level);
                }
                if let Some(xp) = user.experience {
                    println!("XP:       {}", xp);
                }
                if let Some(ref bio) = user.bio {
                    println!("Bio:      {}", bio);
                }
                println!("Joined:   {}", user.created_at.format("%Y-%m-%d"));
            }
            OutputFormat::Json => print_json(user),
            OutputFormat::Quiet => println!("{}", user.username),
        }
    }

    /// Print a list of tasks
    pub fn print_tasks(&self, tasks: &[Task], summary: Option<TaskSummary>) {
        match self.format {
            OutputFormat::Human => {
                if tasks.is_empty() {
                    println!("No tasks found.");
                    return;
                }
                for task in tasks {
                    let mark = if task.completed { "x" } else { " " };
                    let description = task
                        .description
                        .as_deref()
                        .map(|d| format!(" - {}", truncate_line(d, 40)))
                        .unwrap_or_default();
                    println!(
                        "{:>5} [{}] {}{}",
                        task.id,
                        mark,
                        truncate(&task.title, 40),
                        description
                    );
                }
                match summary {
                    Some(s) => println!(
                        "\n{} shown, {} total ({} active, {} completed)",
                        tasks.len(),
                        s.total,
                        s.active(),
                        s.completed
                    ),
                    None => println!("\n{} task(s)", tasks.len()),
                }
            }
            OutputFormat::Json => print_json(&tasks),
            OutputFormat::Quiet => {
                for task in tasks {
                    println!("{}", task.id);
                }
            }
        }
    }

    /// Print a list of quests
    pub fn print_quests(&self, quests: &[Quest]) {
        match self.format {
            OutputFormat::Human => {
                if quests.is_empty() {
                    println!("No quests found.");
                    return;
                }
                for quest in quests {
                    println!(
                        "{:>5} | {} | {}",
                        quest.id,
                        difficulty_stars(quest.difficulty),
                        truncate(&quest.title, 50)
                    );
                }
                println!("\n{} quest(s)", quests.len());
            }
            OutputFormat::Json => print_json(&quests),
            OutputFormat::Quiet => {
                for quest in quests {
                    println!("{}", quest.id);
                }
            }
        }
    }

    /// Print a generated quest suggestion
    pub fn print_generated_quest(&self, quest: &GeneratedQuest) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", quest.title);
                println!("{}", "─".repeat(quest.title.chars().count().max(10)));
                println!("{}", quest.description);
                println!();
                println!("Type:       {}", quest.quest_type);
                println!("Difficulty: {}", difficulty_stars(quest.difficulty));
                println!(
                    "Reward:     {} XP ({})",
                    quest.reward_experience, quest.reward_description
                );
                if !quest.tags.is_empty() {
                    println!("Tags:       {}", quest.tags.join(", "));
                }
                if let Some(ref story) = quest.story_context {
                    println!();
                    println!("{}", story);
                }

                if !quest.tasks.is_empty() {
                    println!();
                    println!("── Tasks ({}) ──", quest.tasks.len());
                    for (i, task) in quest.tasks.iter().enumerate() {
                        let boss = if task.is_boss { " [BOSS]" } else { "" };
                        let duration = task
                            .estimated_duration
                            .map(|m| format!(", ~{} min", m))
                            .unwrap_or_default();
                        println!(
                            "{}. {}{} ({} XP{})",
                            i + 1,
                            task.title,
                            boss,
                            task.experience_reward,
                            duration
                        );
                        println!("   {}", truncate_line(&task.description, 70));
                    }
                }
                println!();
                println!("Total: {} XP", quest.total_experience());
            }
            OutputFormat::Json => print_json(quest),
            OutputFormat::Quiet => println!("{}", quest.title),
        }
    }

    /// Print a task enhancement
    pub fn print_enhancement(&self, enhancement: &TaskEnhancement) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", enhancement.enhanced_title);
                println!("{}", enhancement.enhanced_description);
                println!();
                println!(
                    "Difficulty: {}",
                    difficulty_stars(enhancement.suggested_difficulty)
                );
                println!("Reward:     {} XP", enhancement.suggested_experience);
                if !enhancement.suggested_tags.is_empty() {
                    println!("Tags:       {}", enhancement.suggested_tags.join(", "));
                }
                if let Some(ref story) = enhancement.story_context {
                    println!();
                    println!("{}", story);
                }
            }
            OutputFormat::Json => print_json(enhancement),
            OutputFormat::Quiet => println!("{}", enhancement.enhanced_title),
        }
    }

    /// Print profile stats and achievements
    pub fn print_profile(&self, profile: &ProfileStats) {
        let stats = &profile.stats;
        match self.format {
            OutputFormat::Human => {
                println!("Level {} ({} XP)", stats.level, stats.experience);
                println!();
                println!(
                    "Quests: {}/{} completed",
                    stats.completed_quests, stats.total_quests
                );
                println!(
                    "Tasks:  {}/{} completed ({:.0}%)",
                    stats.completed_tasks,
                    stats.total_tasks,
                    stats.task_completion_rate() * 100.0
                );
                println!();
                if profile.achievements.is_empty() {
                    println!("No achievements yet.");
                } else {
                    println!("── Achievements ({}) ──", profile.achievements.len());
                    for achievement in &profile.achievements {
                        println!(
                            "[{}] {}",
                            achievement.earned_at.format("%Y-%m-%d"),
                            achievement.achievement_type
                        );
                    }
                }
            }
            OutputFormat::Json => print_json(profile_json(profile)),
            OutputFormat::Quiet => println!("{}", stats.level),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn profile_json(profile: &ProfileStats) -> serde_json::Value {
    serde_json::json!({
        "stats": profile.stats,
        "achievements": profile.achievements,
    })
}

fn print_json<T: Serialize>(value: T) {
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON output: {}", e),
    }
}

/// Render difficulty as stars, capped so runaway values stay readable
fn difficulty_stars(difficulty: i32) -> String {
    let shown = difficulty.clamp(0, 5) as usize;
    let stars = "★".repeat(shown);
    if difficulty > 5 {
        format!("{}+ ({})", stars, difficulty)
    } else {
        format!("{:<5}", stars)
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
