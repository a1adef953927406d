//! Application wiring
//!
//! [`App`] opens the session, builds the API client around it, and hands
//! out repositories and controllers that all share that one session.
//!
//! ## Usage
//!
//! ```ignore
//! let app = App::open()?;
//! let tasks = app.task_controller();
//! tasks.load_tasks().await;
//! app.close()?;
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::api::ApiClient;
use crate::config::Config;
use crate::repo::{AuthRepository, QuestRepository, TaskRepository, UserRepository};
use crate::session::Session;
use crate::view::{
    AuthController, QuestController, QuestGeneratorController, StatsController, TaskController,
};

/// Session, client and configuration for one process
pub struct App {
    config: Config,
    session: Arc<Session>,
    client: ApiClient,
}

impl App {
    /// Open using the configuration from disk and environment
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let session_path = config.session_path();
        let session = Session::open(&session_path).map_err(|e| {
            let message = match e.recovery_suggestion() {
                Some(hint) => format!("Failed to open session at {}. {}", session_path.display(), hint),
                None => format!("Failed to open session at {}", session_path.display()),
            };
            anyhow::Error::new(e).context(message)
        })?;
        Self::with_session(config, session)
    }

    /// Build around an already opened session
    pub fn with_session(config: Config, session: Session) -> Result<Self> {
        let session = Arc::new(session);
        let client = ApiClient::new(&config, Arc::clone(&session))
            .context("Failed to create API client")?;
        debug!(api_url = %client.base_url(), "app opened");

        Ok(Self {
            config,
            session,
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn auth_repository(&self) -> AuthRepository {
        AuthRepository::new(self.client.clone())
    }

    pub fn task_repository(&self) -> TaskRepository {
        TaskRepository::new(self.client.clone())
    }

    pub fn quest_repository(&self) -> QuestRepository {
        QuestRepository::new(self.client.clone())
    }

    pub fn user_repository(&self) -> UserRepository {
        UserRepository::new(self.client.clone())
    }

    pub fn auth_controller(&self) -> AuthController {
        AuthController::new(self.auth_repository())
    }

    pub fn task_controller(&self) -> TaskController {
        TaskController::new(self.task_repository())
    }

    pub fn quest_controller(&self) -> QuestController {
        QuestController::new(self.quest_repository())
    }

    pub fn generator_controller(&self) -> QuestGeneratorController {
        QuestGeneratorController::new(self.quest_repository())
    }

    pub fn stats_controller(&self) -> StatsController {
        StatsController::new(self.user_repository())
    }

    /// Close the session
    ///
    /// Controllers and repositories handed out earlier must be dropped
    /// first; otherwise the session is left to close itself on drop.
    pub fn close(self) -> Result<()> {
        let Self {
            session, client, ..
        } = self;
        drop(client);

        match Arc::try_unwrap(session) {
            Ok(session) => session.close().context("Failed to close session"),
            Err(_) => {
                debug!("session still shared, skipping close");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_open_and_close_persists_session() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let app = App::open_with_config(config.clone()).unwrap();
        app.session().save("T");
        app.close().unwrap();

        let app = App::open_with_config(config).unwrap();
        assert_eq!(app.session().get().as_deref(), Some("T"));
        assert!(app.auth_repository().is_logged_in());
    }

    #[test]
    fn test_corrupt_session_names_the_fix() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::write(config.session_path(), [0xff, 0xfe]).unwrap();

        let err = App::open_with_config(config).err().unwrap();
        assert!(err.to_string().contains("log in again"));
    }

    #[test]
    fn test_bad_api_url_fails_open() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            api_url: "::not a url::".to_string(),
            ..test_config(&temp_dir)
        };
        assert!(App::open_with_config(config).is_err());
    }
}
