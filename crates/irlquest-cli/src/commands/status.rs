//! Status command handler

use anyhow::Result;

use irlquest_core::App;

use crate::output::{Output, OutputFormat};

/// Show where the client points and whether it's logged in
pub fn show(app: &App, output: &Output) -> Result<()> {
    let config = app.config();
    let session_path = config.session_path();
    let logged_in = app.session().is_authenticated();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": app.client().base_url().as_str(),
                    "logged_in": logged_in,
                    "session_file": session_path,
                    "data_dir": config.data_dir,
                    "timeout_secs": config.timeout_secs
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", if logged_in { "logged-in" } else { "logged-out" });
        }
        OutputFormat::Human => {
            println!("IRL Quest Status");
            println!("================");
            println!();
            println!("Server:");
            println!("  API:     {}", app.client().base_url());
            println!("  Timeout: {}s", config.timeout_secs);
            println!();
            println!("Session:");
            println!(
                "  Status: {}",
                if logged_in { "logged in" } else { "logged out" }
            );
            println!("  File:   {}", session_path.display());
        }
    }

    Ok(())
}
