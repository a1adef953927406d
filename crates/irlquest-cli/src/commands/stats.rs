//! Stats command handler

use anyhow::Result;

use irlquest_core::App;

use super::settle;
use crate::output::Output;

/// Show level, progress and achievements
pub async fn show(app: &App, output: &Output) -> Result<()> {
    let stats = app.stats_controller();
    let outcome = stats.load().await;
    let profile = settle(outcome, stats.state())?;

    output.print_profile(&profile);
    Ok(())
}
