use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{Id, NewTask, Task, TaskChanges};

/// CRUD for the current user's tasks
#[derive(Debug, Clone)]
pub struct TaskRepository {
    client: ApiClient,
}

impl TaskRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.client.list_tasks().await
    }

    pub async fn get_task(&self, id: Id) -> ApiResult<Task> {
        self.client.get_task(id).await
    }

    pub async fn create_task(&self, title: &str, description: Option<&str>) -> ApiResult<Task> {
        let task = NewTask::new(title, description.map(str::to_string));
        self.client.create_task(&task).await
    }

    pub async fn update_task(&self, id: Id, changes: &TaskChanges) -> ApiResult<Task> {
        self.client.update_task(id, changes).await
    }

    pub async fn delete_task(&self, id: Id) -> ApiResult<()> {
        self.client.delete_task(id).await
    }
}
