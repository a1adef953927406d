//! Task command handlers

use anyhow::{bail, Result};

use irlquest_core::models::TaskChanges;
use irlquest_core::view::TaskFilter;
use irlquest_core::App;

use super::{parse_id, settle};
use crate::output::Output;
use crate::prompt::confirm;

/// List tasks, optionally filtered by completion
pub async fn list(app: &App, filter: TaskFilter, output: &Output) -> Result<()> {
    let tasks = app.task_controller();
    let outcome = tasks.load_tasks().await;
    settle(outcome, tasks.state())?;

    let summary = (filter != TaskFilter::All).then(|| tasks.summary());
    output.print_tasks(&tasks.filtered(filter), summary);
    Ok(())
}

pub async fn add(app: &App, title: String, description: Option<String>, output: &Output) -> Result<()> {
    if title.trim().is_empty() {
        bail!("Task title must not be empty");
    }

    let tasks = app.task_controller();
    let outcome = tasks.create_task(&title, description.as_deref()).await;
    settle(outcome, tasks.state())?;

    output.success(&format!("Added task: {}", title));
    Ok(())
}

pub async fn update(
    app: &App,
    id: String,
    changes: TaskChanges,
    output: &Output,
) -> Result<()> {
    let id = parse_id(&id)?;
    if changes.is_empty() {
        bail!("Nothing to update. Pass --title, --description or --completed.");
    }

    let tasks = app.task_controller();
    let outcome = tasks.update_task(id, &changes).await;
    settle(outcome, tasks.state())?;

    output.success(&format!("Updated task {}", id));
    Ok(())
}

/// Flip a task between done and not done
pub async fn toggle(app: &App, id: String, output: &Output) -> Result<()> {
    let id = parse_id(&id)?;

    let tasks = app.task_controller();
    let outcome = tasks.toggle_task(id).await;
    let list = settle(outcome, tasks.state())?;

    let done = list.iter().find(|t| t.id == id).map(|t| t.completed);
    match done {
        Some(true) => output.success(&format!("Completed task {}", id)),
        Some(false) => output.success(&format!("Reopened task {}", id)),
        None => output.success(&format!("Toggled task {}", id)),
    }
    Ok(())
}

pub async fn delete(app: &App, id: String, force: bool, output: &Output) -> Result<()> {
    let id = parse_id(&id)?;

    if !force && output.is_interactive() && !confirm(&format!("Delete task {}?", id))? {
        output.message("Cancelled.");
        return Ok(());
    }

    let tasks = app.task_controller();
    let outcome = tasks.delete_task(id).await;
    settle(outcome, tasks.state())?;

    output.success(&format!("Deleted task {}", id));
    Ok(())
}
