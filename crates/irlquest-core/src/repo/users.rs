use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{Achievement, User, UserChanges, UserStats};

/// Profile data for the current user
#[derive(Debug, Clone)]
pub struct UserRepository {
    client: ApiClient,
}

impl UserRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ApiResult<UserStats> {
        self.client.user_stats().await
    }

    pub async fn achievements(&self) -> ApiResult<Vec<Achievement>> {
        self.client.user_achievements().await
    }

    pub async fn update_me(&self, changes: &UserChanges) -> ApiResult<User> {
        self.client.update_me(changes).await
    }
}
