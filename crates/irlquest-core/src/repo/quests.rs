use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{
    GeneratedQuest, Id, NewQuest, Quest, QuestChanges, QuestGenerationRequest, TaskEnhancement,
    TaskEnhancementRequest, DEFAULT_DIFFICULTY,
};

/// Quests plus the RAG helpers that produce them
#[derive(Debug, Clone)]
pub struct QuestRepository {
    client: ApiClient,
}

impl QuestRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_quests(&self) -> ApiResult<Vec<Quest>> {
        self.client.list_quests().await
    }

    pub async fn get_quest(&self, id: Id) -> ApiResult<Quest> {
        self.client.get_quest(id).await
    }

    /// Create a quest; difficulty defaults to [`DEFAULT_DIFFICULTY`]
    pub async fn create_quest(
        &self,
        title: &str,
        description: Option<&str>,
        difficulty: Option<i32>,
    ) -> ApiResult<Quest> {
        let quest = NewQuest {
            title: title.to_string(),
            description: description.map(str::to_string),
            difficulty: Some(difficulty.unwrap_or(DEFAULT_DIFFICULTY)),
        };
        self.client.create_quest(&quest).await
    }

    /// Keep a generated suggestion as a regular quest
    pub async fn save_generated(&self, generated: &GeneratedQuest) -> ApiResult<Quest> {
        self.client.create_quest(&generated.to_new_quest()).await
    }

    pub async fn update_quest(&self, id: Id, changes: &QuestChanges) -> ApiResult<Quest> {
        self.client.update_quest(id, changes).await
    }

    pub async fn delete_quest(&self, id: Id) -> ApiResult<()> {
        self.client.delete_quest(id).await
    }

    pub async fn complete_quest(&self, id: Id) -> ApiResult<Quest> {
        self.client.complete_quest(id).await
    }

    pub async fn generate_quest(&self, request: &QuestGenerationRequest) -> ApiResult<GeneratedQuest> {
        self.client.generate_quest(request).await
    }

    pub async fn enhance_task(&self, request: &TaskEnhancementRequest) -> ApiResult<TaskEnhancement> {
        self.client.enhance_task(request).await
    }
}
