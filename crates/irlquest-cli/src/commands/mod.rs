//! Command handlers

pub mod auth;
pub mod config;
pub mod generate;
pub mod quest;
pub mod stats;
pub mod status;
pub mod task;

use anyhow::{anyhow, Result};

use irlquest_core::{Outcome, ViewState};

/// Turn a controller's settled state into a command result
fn settle<T>(outcome: Outcome, state: ViewState<T>) -> Result<T> {
    match state {
        ViewState::Success(data) if outcome.is_success() => Ok(data),
        ViewState::Failure { message, .. } => Err(anyhow!(message)),
        _ => Err(anyhow!("Operation did not complete")),
    }
}

/// Read an id argument
fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow!("Invalid id: '{}'", raw))
}
