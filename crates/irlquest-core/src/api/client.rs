//! HTTP client for the IRL Quest REST API
//!
//! [`ApiClient`] is a fixed catalog of one-shot operations. Each call builds
//! one request, sends it through the [`AuthPipeline`], and parses one
//! response. There is no retry and no client-side validation beyond the
//! types themselves.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::pipeline::AuthPipeline;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Achievement, GeneratedQuest, Id, NewQuest, NewTask, NewUser, Quest, QuestChanges,
    QuestGenerationRequest, Task, TaskChanges, TaskEnhancement, TaskEnhancementRequest,
    TokenResponse, User, UserChanges, UserStats,
};
use crate::session::Session;

/// Typed client for the `/api/v1` routes
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    pipeline: AuthPipeline,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &Config, session: Arc<Session>) -> ApiResult<Self> {
        Self::with_base_url(&config.api_url, session, config.timeout())
    }

    /// Create a client for an explicit base URL
    ///
    /// `timeout` is applied both to connecting and to reading the response.
    pub fn with_base_url(base_url: &str, session: Arc<Session>, timeout: Duration) -> ApiResult<Self> {
        let base_url = parse_base_url(base_url)?;

        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(concat!("irlquest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::from_transport)?;

        Ok(Self {
            http,
            base_url,
            pipeline: AuthPipeline::new(session),
        })
    }

    /// Base URL every path is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session used to authorize requests
    pub fn session(&self) -> &Arc<Session> {
        self.pipeline.session()
    }

    // ==================== Auth ====================

    /// Create a user account
    pub async fn register(&self, user: &NewUser) -> ApiResult<User> {
        self.send_json(Method::POST, "auth/register", user).await
    }

    /// Exchange credentials for an access token
    ///
    /// The token is returned as-is; storing it is up to the caller.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenResponse> {
        let request = self
            .request(Method::POST, "auth/token")?
            .form(&[("username", username), ("password", password)]);
        let response = self.execute(request, Method::POST, "auth/token").await?;
        read_json(response).await
    }

    /// Fetch the user the current token belongs to
    pub async fn me(&self) -> ApiResult<User> {
        self.get_json("auth/me").await
    }

    /// Update the current user's username or password
    pub async fn update_me(&self, changes: &UserChanges) -> ApiResult<User> {
        self.send_json(Method::PUT, "users/me", changes).await
    }

    // ==================== Tasks ====================

    pub async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.get_json("tasks").await
    }

    pub async fn get_task(&self, id: Id) -> ApiResult<Task> {
        self.get_json(&format!("tasks/{}", id)).await
    }

    pub async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        self.send_json(Method::POST, "tasks", task).await
    }

    pub async fn update_task(&self, id: Id, changes: &TaskChanges) -> ApiResult<Task> {
        self.send_json(Method::PUT, &format!("tasks/{}", id), changes)
            .await
    }

    pub async fn delete_task(&self, id: Id) -> ApiResult<()> {
        self.delete(&format!("tasks/{}", id)).await
    }

    // ==================== Quests ====================

    pub async fn list_quests(&self) -> ApiResult<Vec<Quest>> {
        self.get_json("quests").await
    }

    pub async fn get_quest(&self, id: Id) -> ApiResult<Quest> {
        self.get_json(&format!("quests/{}", id)).await
    }

    pub async fn create_quest(&self, quest: &NewQuest) -> ApiResult<Quest> {
        self.send_json(Method::POST, "quests", quest).await
    }

    pub async fn update_quest(&self, id: Id, changes: &QuestChanges) -> ApiResult<Quest> {
        self.send_json(Method::PUT, &format!("quests/{}", id), changes)
            .await
    }

    pub async fn delete_quest(&self, id: Id) -> ApiResult<()> {
        self.delete(&format!("quests/{}", id)).await
    }

    pub async fn complete_quest(&self, id: Id) -> ApiResult<Quest> {
        let path = format!("quests/{}/complete", id);
        let request = self.request(Method::POST, &path)?;
        let response = self.execute(request, Method::POST, &path).await?;
        read_json(response).await
    }

    // ==================== RAG ====================

    /// Turn free-form text into a structured quest suggestion
    pub async fn generate_quest(&self, request: &QuestGenerationRequest) -> ApiResult<GeneratedQuest> {
        self.send_json(Method::POST, "rag/generate-quest", request)
            .await
    }

    /// Rewrite a plain task as a game-flavoured one
    pub async fn enhance_task(&self, request: &TaskEnhancementRequest) -> ApiResult<TaskEnhancement> {
        self.send_json(Method::POST, "rag/enhance-task", request)
            .await
    }

    // ==================== Profile ====================

    pub async fn user_stats(&self) -> ApiResult<UserStats> {
        self.get_json("users/me/stats").await
    }

    pub async fn user_achievements(&self) -> ApiResult<Vec<Achievement>> {
        self.get_json("users/me/achievements").await
    }

    // ==================== Plumbing ====================

    /// Resolve a path against the base URL
    pub fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            details: e.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.url(path)?;
        Ok(self.pipeline.authorize(self.http.request(method, url)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let request = self.request(Method::GET, path)?;
        let response = self.execute(request, Method::GET, path).await?;
        read_json(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method.clone(), path)?.json(body);
        let response = self.execute(request, method, path).await?;
        read_json(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.request(Method::DELETE, path)?;
        self.execute(request, Method::DELETE, path).await?;
        Ok(())
    }

    /// Send a request and turn non-success statuses into errors
    async fn execute(&self, request: RequestBuilder, method: Method, path: &str) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| {
            debug!(%method, path, error = %e, "request failed");
            ApiError::from_transport(e)
        })?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }
}

/// Read a success body as JSON
///
/// Unknown fields are ignored; missing required fields fail the call.
async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let body = response.text().await.map_err(ApiError::from_transport)?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        details: e.to_string(),
    })
}

/// Parse the base URL, making sure relative paths join under it
fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl {
        url: raw.to_string(),
        details: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl {
            url: raw.to_string(),
            details: "not a base URL".to_string(),
        });
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn test_client(uri: &str, session: Arc<Session>) -> ApiClient {
        ApiClient::with_base_url(&format!("{}/api/v1", uri), session, Duration::from_secs(5)).unwrap()
    }

    fn task_json(id: i64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": null,
            "completed": false,
            "created_at": "2024-05-01T10:00:00Z",
            "owner_id": 1
        })
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let session = Arc::new(Session::in_memory());
        let client =
            ApiClient::with_base_url("http://localhost:8000/api/v1", session, Duration::from_secs(1))
                .unwrap();

        assert_eq!(
            client.url("tasks/5").unwrap().as_str(),
            "http://localhost:8000/api/v1/tasks/5"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let session = Arc::new(Session::in_memory());
        let result = ApiClient::with_base_url("not a url", session, Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_login_sends_form_and_returns_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/auth/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("username=alice"))
            .and(body_string_contains("password=pw"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "T", "token_type": "bearer"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = Arc::new(Session::in_memory());
        let client = test_client(&server.uri(), Arc::clone(&session));
        let token = client.login("alice", "pw").await.unwrap();

        assert_eq!(token.access_token, "T");
        assert_eq!(token.token_type, "bearer");
        // The client itself never stores the token
        assert!(session.get().is_none());
    }

    #[tokio::test]
    async fn test_list_tasks_with_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/tasks"))
            .and(header("authorization", "Bearer T"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([task_json(1, "Buy milk"), task_json(2, "Walk dog")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = Arc::new(Session::in_memory());
        session.save("T");
        let client = test_client(&server.uri(), session);

        let tasks = client.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Buy milk");
    }

    #[tokio::test]
    async fn test_unauthenticated_request_has_no_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/quests"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v1/quests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        let quests = client.list_quests().await.unwrap();
        assert!(quests.is_empty());
    }

    #[tokio::test]
    async fn test_create_task_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/tasks"))
            .and(body_json(json!({"title": "Buy milk"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(task_json(9, "Buy milk")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        let task = client
            .create_task(&NewTask::new("Buy milk", None))
            .await
            .unwrap();
        assert_eq!(task.id, 9);
    }

    #[tokio::test]
    async fn test_update_task_sends_only_changes() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/v1/tasks/3"))
            .and(body_json(json!({"completed": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "title": "Read",
                "completed": true,
                "created_at": "2024-05-01T10:00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        let task = client
            .update_task(3, &TaskChanges::completed(true))
            .await
            .unwrap();
        assert!(task.completed);
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/quests/4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        client.delete_quest(4).await.unwrap();
    }

    #[tokio::test]
    async fn test_not_found_uses_server_detail() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/tasks/5"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Task not found"})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        let err = client.delete_task(5).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Task not found");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        let err = client.me().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Nothing listens on port 1
        let client = test_client("http://127.0.0.1:1", Arc::new(Session::in_memory()));
        let err = client.list_tasks().await.unwrap_err();
        assert!(err.is_transport());
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_generate_quest_round_trip() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/rag/generate-quest"))
            .and(body_json(json!({
                "todo_text": "Clean my room",
                "difficulty_preference": 3,
                "theme_preference": "fantasy"
            })))
            .respond_with(|_: &Request| {
                ResponseTemplate::new(200).set_body_json(json!({
                    "title": "The Chamber of Chaos",
                    "description": "Restore order",
                    "difficulty": 3,
                    "reward_experience": 120,
                    "reward_description": "A tidy sanctuary",
                    "tags": ["home", "cleaning"],
                    "quest_type": "cleaning",
                    "tasks": [
                        {"title": "Gather the scrolls", "description": "Pick up papers", "difficulty": 1, "experience_reward": 20, "estimated_duration": 10}
                    ],
                    "story_context": "Dust has fallen over the realm",
                    "model_version": "v2"
                }))
            })
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        let request = QuestGenerationRequest::new("Clean my room")
            .with_difficulty(3)
            .with_theme("fantasy");
        let quest = client.generate_quest(&request).await.unwrap();

        assert_eq!(quest.title, "The Chamber of Chaos");
        assert_eq!(quest.tasks.len(), 1);
        assert_eq!(quest.tasks[0].estimated_duration, Some(10));
    }

    #[tokio::test]
    async fn test_complete_quest_posts_to_complete_route() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/quests/4/complete"))
            .and(header("authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 4,
                "title": "Slay the laundry",
                "difficulty": 2,
                "created_at": "2024-05-01T10:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = Arc::new(Session::in_memory());
        session.save("T");
        let client = test_client(&server.uri(), session);

        let quest = client.complete_quest(4).await.unwrap();
        assert_eq!(quest.id, 4);
    }

    #[tokio::test]
    async fn test_enhance_task_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/rag/enhance-task"))
            .and(body_json(json!({"task_text": "Do the dishes", "user_level": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "enhanced_title": "Cleanse the Chalices",
                "enhanced_description": "The kingdom's goblets await",
                "suggested_difficulty": 1,
                "suggested_experience": 15
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        let request = TaskEnhancementRequest {
            task_text: "Do the dishes".to_string(),
            context: None,
            user_level: Some(2),
        };

        let enhancement = client.enhance_task(&request).await.unwrap();
        assert_eq!(enhancement.enhanced_title, "Cleanse the Chalices");
        assert!(enhancement.suggested_tags.is_empty());
    }

    #[tokio::test]
    async fn test_update_me_sends_only_changes() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/v1/users/me"))
            .and(body_json(json!({"username": "bob"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "email": "a@example.com",
                "username": "bob",
                "is_active": true,
                "created_at": "2024-05-01T10:00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Arc::new(Session::in_memory()));
        let changes = UserChanges {
            username: Some("bob".to_string()),
            ..UserChanges::default()
        };

        let user = client.update_me(&changes).await.unwrap();
        assert_eq!(user.username, "bob");
    }
}
