use std::sync::Arc;

use tracing::info;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{NewUser, TokenResponse, User};
use crate::session::Session;

/// Login, registration and the current user
#[derive(Debug, Clone)]
pub struct AuthRepository {
    client: ApiClient,
}

impl AuthRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    /// Log in and store the issued token in the session
    ///
    /// The token is saved before this returns, so the next request made
    /// through the same session is authenticated. On failure the session is
    /// left untouched.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenResponse> {
        let token = self.client.login(username, password).await?;
        self.session().save(token.access_token.clone());
        info!(username, "logged in");
        Ok(token)
    }

    /// Create an account; does not log in
    pub async fn register(&self, email: &str, username: &str, password: &str) -> ApiResult<User> {
        let user = NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.client.register(&user).await
    }

    pub async fn me(&self) -> ApiResult<User> {
        self.client.me().await
    }

    /// Forget the stored token
    pub fn logout(&self) {
        self.session().clear();
        info!("logged out");
    }

    pub fn is_logged_in(&self) -> bool {
        self.session().is_authenticated()
    }
}
