use tokio::sync::watch;

use super::publisher::{with_fallback, Outcome, StatePublisher};
use super::state::ViewState;
use crate::models::{Id, Quest, QuestChanges};
use crate::repo::QuestRepository;

/// Quest list screen
#[derive(Debug)]
pub struct QuestController {
    repo: QuestRepository,
    state: StatePublisher<Vec<Quest>>,
}

impl QuestController {
    pub fn new(repo: QuestRepository) -> Self {
        Self {
            repo,
            state: StatePublisher::new(),
        }
    }

    pub fn state(&self) -> ViewState<Vec<Quest>> {
        self.state.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<Vec<Quest>>> {
        self.state.subscribe()
    }

    pub async fn load_quests(&self) -> Outcome {
        self.state
            .run("load_quests", self.repo.list_quests(), with_fallback("Failed to load quests"))
            .await
    }

    pub async fn create_quest(
        &self,
        title: &str,
        description: Option<&str>,
        difficulty: Option<i32>,
    ) -> Outcome {
        self.state
            .run_mutation(
                "create_quest",
                self.repo.create_quest(title, description, difficulty),
                self.repo.list_quests(),
                with_fallback("Failed to create quest"),
            )
            .await
    }

    pub async fn update_quest(&self, id: Id, changes: &QuestChanges) -> Outcome {
        self.state
            .run_mutation(
                "update_quest",
                self.repo.update_quest(id, changes),
                self.repo.list_quests(),
                with_fallback("Failed to update quest"),
            )
            .await
    }

    pub async fn delete_quest(&self, id: Id) -> Outcome {
        self.state
            .run_mutation(
                "delete_quest",
                self.repo.delete_quest(id),
                self.repo.list_quests(),
                with_fallback("Failed to delete quest"),
            )
            .await
    }

    pub async fn complete_quest(&self, id: Id) -> Outcome {
        self.state
            .run_mutation(
                "complete_quest",
                self.repo.complete_quest(id),
                self.repo.list_quests(),
                with_fallback("Failed to complete quest"),
            )
            .await
    }

    /// Loaded quests, easiest first; ties keep server order
    pub fn sorted_by_difficulty(&self) -> Vec<Quest> {
        let mut quests = self.state.data().unwrap_or_default();
        quests.sort_by_key(|q| q.difficulty);
        quests
    }

    pub fn close(&self) {
        self.state.close();
    }
}
