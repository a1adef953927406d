//! Quest command handlers

use anyhow::{bail, Result};

use irlquest_core::models::QuestChanges;
use irlquest_core::App;

use super::{parse_id, settle};
use crate::output::Output;
use crate::prompt::confirm;

/// List quests in server order or easiest first
pub async fn list(app: &App, by_difficulty: bool, output: &Output) -> Result<()> {
    let quests = app.quest_controller();
    let outcome = quests.load_quests().await;
    let loaded = settle(outcome, quests.state())?;

    if by_difficulty {
        output.print_quests(&quests.sorted_by_difficulty());
    } else {
        output.print_quests(&loaded);
    }
    Ok(())
}

pub async fn add(
    app: &App,
    title: String,
    description: Option<String>,
    difficulty: Option<i32>,
    output: &Output,
) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Quest title must not be empty");
    }

    let quests = app.quest_controller();
    let outcome = quests
        .create_quest(&title, description.as_deref(), difficulty)
        .await;
    settle(outcome, quests.state())?;

    output.success(&format!("Added quest: {}", title));
    Ok(())
}

pub async fn update(app: &App, id: String, changes: QuestChanges, output: &Output) -> Result<()> {
    let id = parse_id(&id)?;
    if changes.is_empty() {
        bail!("Nothing to update. Pass --title, --description or --difficulty.");
    }

    let quests = app.quest_controller();
    let outcome = quests.update_quest(id, &changes).await;
    settle(outcome, quests.state())?;

    output.success(&format!("Updated quest {}", id));
    Ok(())
}

pub async fn complete(app: &App, id: String, output: &Output) -> Result<()> {
    let id = parse_id(&id)?;

    let quests = app.quest_controller();
    let outcome = quests.complete_quest(id).await;
    settle(outcome, quests.state())?;

    output.success(&format!("Completed quest {}", id));
    Ok(())
}

pub async fn delete(app: &App, id: String, force: bool, output: &Output) -> Result<()> {
    let id = parse_id(&id)?;

    if !force && output.is_interactive() && !confirm(&format!("Delete quest {}?", id))? {
        output.message("Cancelled.");
        return Ok(());
    }

    let quests = app.quest_controller();
    let outcome = quests.delete_quest(id).await;
    settle(outcome, quests.state())?;

    output.success(&format!("Deleted quest {}", id));
    Ok(())
}
