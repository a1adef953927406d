//! Quest generation and task enhancement

use anyhow::{Context, Result};

use irlquest_core::models::{QuestGenerationRequest, TaskEnhancementRequest};
use irlquest_core::App;

use super::settle;
use crate::output::Output;

/// Options for `irlquest generate`
pub struct GenerateOptions {
    pub context: Option<String>,
    pub difficulty: Option<i32>,
    pub theme: Option<String>,
    pub level: Option<i32>,
    /// Also create the suggestion as a quest
    pub save: bool,
}

/// Turn free-form text into a quest suggestion
pub async fn generate(app: &App, text: String, options: GenerateOptions, output: &Output) -> Result<()> {
    let mut request = QuestGenerationRequest::new(text);
    if let Some(context) = options.context {
        request = request.with_context(context);
    }
    if let Some(difficulty) = options.difficulty {
        request = request.with_difficulty(difficulty);
    }
    if let Some(theme) = options.theme {
        request = request.with_theme(theme);
    }
    if let Some(level) = options.level {
        request = request.with_user_level(level);
    }

    let generator = app.generator_controller();
    let outcome = generator.generate_quest(&request).await;
    let generated = settle(outcome, generator.state())?;

    output.print_generated_quest(&generated);

    if options.save {
        let quest = app
            .quest_repository()
            .save_generated(&generated)
            .await
            .context("Failed to save generated quest")?;
        output.success(&format!("Saved as quest {}", quest.id));
    }

    Ok(())
}

/// Rewrite a plain task as a game-flavoured one
pub async fn enhance(
    app: &App,
    text: String,
    context: Option<String>,
    level: Option<i32>,
    output: &Output,
) -> Result<()> {
    let request = TaskEnhancementRequest {
        task_text: text,
        context,
        user_level: level,
    };

    let enhancement = app
        .quest_repository()
        .enhance_task(&request)
        .await
        .context("Failed to enhance task")?;

    output.print_enhancement(&enhancement);
    Ok(())
}
