use tokio::sync::watch;

use super::publisher::{with_fallback, Outcome, StatePublisher};
use super::state::ViewState;
use crate::error::ApiError;
use crate::models::User;
use crate::repo::AuthRepository;

/// Login and registration screen
///
/// Data is the current user once loaded; a successful login or
/// registration publishes `Success(None)` until
/// [`load_current_user`](Self::load_current_user) runs.
#[derive(Debug)]
pub struct AuthController {
    repo: AuthRepository,
    state: StatePublisher<Option<User>>,
}

impl AuthController {
    pub fn new(repo: AuthRepository) -> Self {
        Self {
            repo,
            state: StatePublisher::new(),
        }
    }

    pub fn state(&self) -> ViewState<Option<User>> {
        self.state.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Option<User>>> {
        self.state.subscribe()
    }

    pub fn is_logged_in(&self) -> bool {
        self.repo.is_logged_in()
    }

    pub async fn login(&self, username: &str, password: &str) -> Outcome {
        let op = async {
            self.repo.login(username, password).await?;
            Ok::<_, ApiError>(None)
        };
        self.state.run("login", op, with_fallback("Login failed")).await
    }

    /// Register, then log in with the same credentials
    pub async fn register(&self, email: &str, username: &str, password: &str) -> Outcome {
        let op = async {
            self.repo.register(email, username, password).await?;
            self.repo.login(username, password).await?;
            Ok::<_, ApiError>(None)
        };
        self.state
            .run("register", op, with_fallback("Registration failed"))
            .await
    }

    pub async fn load_current_user(&self) -> Outcome {
        let op = async { self.repo.me().await.map(Some) };
        self.state
            .run("load_current_user", op, with_fallback("Failed to load user"))
            .await
    }

    /// Clear the session and forget the loaded user
    pub fn logout(&self) {
        self.repo.logout();
        self.state.reset(ViewState::Idle);
    }

    /// Stop publishing; in-flight calls are abandoned
    pub fn close(&self) {
        self.state.close();
    }
}
