//! Data models for IRL Quest
//!
//! Wire shapes for the `/api/v1` REST contract: users, tasks, quests, the
//! RAG generation endpoints and profile aggregates.
//!
//! Responses ignore unknown fields. Optional request fields are omitted from
//! the body when unset.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier
pub type Id = i64;

/// Difficulty used when the server leaves it unset
pub const DEFAULT_DIFFICULTY: i32 = 1;

// ==================== Auth ====================

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Id,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub experience: Option<i64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Partial update of the current user
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Token issued by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// ==================== Tasks ====================

/// A task owned by the current user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub owner_id: Option<Id>,
}

/// Task creation body
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }
}

/// Partial task update
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskChanges {
    /// Only flip the completion flag
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Check if no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

// ==================== Quests ====================

/// A quest owned by the current user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quest {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Arbitrary scale; `null` on the wire reads as the default
    #[serde(
        default = "default_difficulty",
        deserialize_with = "difficulty_or_default"
    )]
    pub difficulty: i32,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub owner_id: Option<Id>,
}

fn default_difficulty() -> i32 {
    DEFAULT_DIFFICULTY
}

fn difficulty_or_default<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(DEFAULT_DIFFICULTY))
}

/// Quest creation body
#[derive(Debug, Clone, Serialize)]
pub struct NewQuest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i32>,
}

/// Partial quest update
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct QuestChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i32>,
}

impl QuestChanges {
    /// Check if no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.difficulty.is_none()
    }
}

// ==================== RAG generation ====================

/// Free-form text to turn into a structured quest
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestGenerationRequest {
    pub todo_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_preference: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_level: Option<i32>,
}

impl QuestGenerationRequest {
    pub fn new(todo_text: impl Into<String>) -> Self {
        Self {
            todo_text: todo_text.into(),
            context: None,
            difficulty_preference: None,
            theme_preference: None,
            user_level: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: i32) -> Self {
        self.difficulty_preference = Some(difficulty);
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme_preference = Some(theme.into());
        self
    }

    pub fn with_user_level(mut self, level: i32) -> Self {
        self.user_level = Some(level);
        self
    }
}

/// Quest produced by the generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedQuest {
    pub title: String,
    pub description: String,
    pub difficulty: i32,
    pub reward_experience: i32,
    pub reward_description: String,
    pub tags: Vec<String>,
    pub quest_type: String,
    pub tasks: Vec<GeneratedTask>,
    #[serde(default)]
    pub story_context: Option<String>,
}

impl GeneratedQuest {
    /// Experience from the quest reward plus every subtask
    pub fn total_experience(&self) -> i64 {
        i64::from(self.reward_experience)
            + self
                .tasks
                .iter()
                .map(|t| i64::from(t.experience_reward))
                .sum::<i64>()
    }

    /// Creation body for saving this suggestion as a real quest
    pub fn to_new_quest(&self) -> NewQuest {
        NewQuest {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            difficulty: Some(self.difficulty),
        }
    }
}

/// One step of a generated quest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedTask {
    pub title: String,
    pub description: String,
    pub difficulty: i32,
    pub experience_reward: i32,
    #[serde(default)]
    pub estimated_duration: Option<i32>,
    #[serde(default)]
    pub is_boss: bool,
}

/// Plain task text to rewrite as a game-flavoured task
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskEnhancementRequest {
    pub task_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_level: Option<i32>,
}

/// Result of the task enhancement endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskEnhancement {
    pub enhanced_title: String,
    pub enhanced_description: String,
    pub suggested_difficulty: i32,
    pub suggested_experience: i32,
    #[serde(default)]
    pub story_context: Option<String>,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
}

// ==================== Profile ====================

/// Aggregate progress for the current user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub level: i32,
    pub experience: i64,
    pub total_quests: i64,
    pub completed_quests: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub achievements_count: i64,
}

impl UserStats {
    /// Share of tasks completed, 0.0 when there are none
    pub fn task_completion_rate(&self) -> f64 {
        if self.total_tasks <= 0 {
            0.0
        } else {
            self.completed_tasks as f64 / self.total_tasks as f64
        }
    }
}

/// Earned achievement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: Id,
    pub achievement_type: String,
    #[serde(default)]
    pub achievement_data: BTreeMap<String, serde_json::Value>,
    #[serde(with = "timestamp")]
    pub earned_at: DateTime<Utc>,
}

/// Timestamps as sent by either server variant
///
/// Accepts RFC 3339 with an offset (`2024-05-01T10:00:00Z`) or a naive
/// ISO date-time (`2024-05-01T10:00:00.123456`), which is read as UTC.
/// Always serializes as RFC 3339.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse a timestamp in either accepted form
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_task_ignores_unknown_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "title": "Buy milk",
            "completed": false,
            "created_at": "2024-05-01T10:00:00Z",
            "priority": "high",
            "tags": ["home"]
        }))
        .unwrap();

        assert_eq!(task.id, 7);
        assert_eq!(task.title, "Buy milk");
        assert!(task.description.is_none());
        assert!(task.owner_id.is_none());
    }

    #[test]
    fn test_task_missing_required_field_fails() {
        let result = serde_json::from_value::<Task>(json!({
            "id": 7,
            "title": "Buy milk",
            "created_at": "2024-05-01T10:00:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "title": "t",
            "completed": true,
            "created_at": "2024-05-01T10:30:15.123456"
        }))
        .unwrap();

        assert_eq!(task.created_at.year(), 2024);
        assert_eq!(task.created_at.hour(), 10);
        assert_eq!(task.created_at.minute(), 30);
    }

    #[test]
    fn test_offset_timestamp_is_normalized() {
        let parsed = timestamp::parse("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(parsed.hour(), 10);
        assert!(timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_quest_null_difficulty_defaults() {
        let quest: Quest = serde_json::from_value(json!({
            "id": 3,
            "title": "Slay the laundry",
            "difficulty": null,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(quest.difficulty, DEFAULT_DIFFICULTY);

        let quest: Quest = serde_json::from_value(json!({
            "id": 4,
            "title": "Epic",
            "difficulty": 42,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(quest.difficulty, 42);
    }

    #[test]
    fn test_optional_request_fields_are_omitted() {
        let body = serde_json::to_value(NewTask::new("Buy milk", None)).unwrap();
        assert_eq!(body, json!({"title": "Buy milk"}));

        let body = serde_json::to_value(TaskChanges::completed(true)).unwrap();
        assert_eq!(body, json!({"completed": true}));

        let body = serde_json::to_value(
            QuestGenerationRequest::new("Clean my room")
                .with_difficulty(3)
                .with_theme("fantasy"),
        )
        .unwrap();
        assert_eq!(
            body,
            json!({
                "todo_text": "Clean my room",
                "difficulty_preference": 3,
                "theme_preference": "fantasy"
            })
        );
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let token: TokenResponse = serde_json::from_value(json!({"access_token": "T"})).unwrap();
        assert_eq!(token.token_type, "bearer");
    }

    #[test]
    fn test_generated_quest_helpers() {
        let quest: GeneratedQuest = serde_json::from_value(json!({
            "title": "The Chamber of Chaos",
            "description": "Restore order to your room",
            "difficulty": 3,
            "reward_experience": 100,
            "reward_description": "A tidy sanctuary",
            "tags": ["home"],
            "quest_type": "cleaning",
            "tasks": [
                {"title": "Gather the scrolls", "description": "Pick up papers", "difficulty": 1, "experience_reward": 20},
                {"title": "Face the dust dragon", "description": "Vacuum", "difficulty": 3, "experience_reward": 50, "is_boss": true}
            ]
        }))
        .unwrap();

        assert_eq!(quest.total_experience(), 170);
        assert!(!quest.tasks[0].is_boss);
        assert!(quest.tasks[1].is_boss);

        let new_quest = quest.to_new_quest();
        assert_eq!(new_quest.title, "The Chamber of Chaos");
        assert_eq!(new_quest.difficulty, Some(3));
    }

    #[test]
    fn test_stats_completion_rate() {
        let mut stats = UserStats {
            level: 2,
            experience: 250,
            total_quests: 3,
            completed_quests: 1,
            total_tasks: 0,
            completed_tasks: 0,
            achievements_count: 1,
        };
        assert_eq!(stats.task_completion_rate(), 0.0);

        stats.total_tasks = 4;
        stats.completed_tasks = 1;
        assert!((stats.task_completion_rate() - 0.25).abs() < f64::EPSILON);
    }
}
