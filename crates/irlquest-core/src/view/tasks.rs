use tokio::sync::watch;

use super::publisher::{with_fallback, Outcome, StatePublisher};
use super::state::ViewState;
use crate::models::{Id, Task, TaskChanges};
use crate::repo::TaskRepository;

/// Which tasks to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

impl std::str::FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" | "done" => Ok(TaskFilter::Completed),
            other => Err(format!("unknown task filter '{}'", other)),
        }
    }
}

/// Task counts for the loaded list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
}

impl TaskSummary {
    pub fn active(&self) -> usize {
        self.total - self.completed
    }
}

/// Task list screen
///
/// Every mutation re-fetches the whole list before publishing, and that
/// re-fetch outranks loads started before the write finished.
#[derive(Debug)]
pub struct TaskController {
    repo: TaskRepository,
    state: StatePublisher<Vec<Task>>,
}

impl TaskController {
    pub fn new(repo: TaskRepository) -> Self {
        Self {
            repo,
            state: StatePublisher::new(),
        }
    }

    pub fn state(&self) -> ViewState<Vec<Task>> {
        self.state.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Vec<Task>>> {
        self.state.subscribe()
    }

    pub async fn load_tasks(&self) -> Outcome {
        self.state
            .run("load_tasks", self.repo.list_tasks(), with_fallback("Failed to load tasks"))
            .await
    }

    pub async fn create_task(&self, title: &str, description: Option<&str>) -> Outcome {
        self.state
            .run_mutation(
                "create_task",
                self.repo.create_task(title, description),
                self.repo.list_tasks(),
                with_fallback("Failed to create task"),
            )
            .await
    }

    pub async fn update_task(&self, id: Id, changes: &TaskChanges) -> Outcome {
        self.state
            .run_mutation(
                "update_task",
                self.repo.update_task(id, changes),
                self.repo.list_tasks(),
                with_fallback("Failed to update task"),
            )
            .await
    }

    /// Flip a task's completion flag
    ///
    /// Uses the loaded copy of the task when there is one, otherwise fetches
    /// it first.
    pub async fn toggle_task(&self, id: Id) -> Outcome {
        let cached = self.find(id);
        let write = async {
            let task = match cached {
                Some(task) => task,
                None => self.repo.get_task(id).await?,
            };
            self.repo
                .update_task(id, &TaskChanges::completed(!task.completed))
                .await
        };
        self.state
            .run_mutation(
                "toggle_task",
                write,
                self.repo.list_tasks(),
                with_fallback("Failed to update task"),
            )
            .await
    }

    pub async fn delete_task(&self, id: Id) -> Outcome {
        self.state
            .run_mutation(
                "delete_task",
                self.repo.delete_task(id),
                self.repo.list_tasks(),
                with_fallback("Failed to delete task"),
            )
            .await
    }

    /// Loaded tasks matching `filter`
    pub fn filtered(&self, filter: TaskFilter) -> Vec<Task> {
        self.state
            .data()
            .unwrap_or_default()
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect()
    }

    pub fn summary(&self) -> TaskSummary {
        let tasks = self.state.data().unwrap_or_default();
        TaskSummary {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.completed).count(),
        }
    }

    pub fn close(&self) {
        self.state.close();
    }

    fn find(&self, id: Id) -> Option<Task> {
        self.state.data()?.into_iter().find(|t| t.id == id)
    }
}
