//! Auth command handlers

use anyhow::{Context, Result};

use irlquest_core::models::UserChanges;
use irlquest_core::App;

use super::settle;
use crate::output::Output;
use crate::prompt::read_password;

/// Log in and store the session token
pub async fn login(app: &App, username: String, password: Option<String>, output: &Output) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password("Password")?,
    };

    let auth = app.auth_controller();
    let outcome = auth.login(&username, &password).await;
    settle(outcome, auth.state()).context("Login failed")?;

    output.success(&format!("Logged in as {}", username));
    Ok(())
}

/// Create an account, then log in with it
pub async fn register(
    app: &App,
    email: String,
    username: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password("Choose a password")?,
    };

    let auth = app.auth_controller();
    let outcome = auth.register(&email, &username, &password).await;
    settle(outcome, auth.state()).context("Registration failed")?;

    output.success(&format!("Registered and logged in as {}", username));
    Ok(())
}

pub fn logout(app: &App, output: &Output) -> Result<()> {
    let auth = app.auth_controller();
    if !auth.is_logged_in() {
        output.message("Not logged in.");
        return Ok(());
    }

    auth.logout();
    output.success("Logged out");
    Ok(())
}

/// Show the logged-in user
pub async fn whoami(app: &App, output: &Output) -> Result<()> {
    let auth = app.auth_controller();
    if !auth.is_logged_in() {
        anyhow::bail!("Not logged in. Run `irlquest login <username>` first.");
    }

    let outcome = auth.load_current_user().await;
    let user = settle(outcome, auth.state())?
        .context("Server returned no user")?;

    output.print_user(&user);
    Ok(())
}

/// Change username or password
pub async fn update_profile(
    app: &App,
    username: Option<String>,
    change_password: bool,
    output: &Output,
) -> Result<()> {
    let password = if change_password {
        Some(read_password("New password")?)
    } else {
        None
    };

    let changes = UserChanges { username, password };
    if changes.username.is_none() && changes.password.is_none() {
        anyhow::bail!("Nothing to update. Pass --username or --password.");
    }

    let user = app
        .user_repository()
        .update_me(&changes)
        .await
        .context("Failed to update profile")?;

    output.success("Profile updated");
    output.print_user(&user);
    Ok(())
}
