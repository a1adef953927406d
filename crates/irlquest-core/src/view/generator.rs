use tokio::sync::watch;

use super::publisher::{Outcome, StatePublisher};
use super::state::ViewState;
use crate::error::ApiError;
use crate::models::{GeneratedQuest, QuestGenerationRequest};
use crate::repo::QuestRepository;

/// Quest generator screen
#[derive(Debug)]
pub struct QuestGeneratorController {
    repo: QuestRepository,
    state: StatePublisher<GeneratedQuest>,
}

impl QuestGeneratorController {
    pub fn new(repo: QuestRepository) -> Self {
        Self {
            repo,
            state: StatePublisher::new(),
        }
    }

    pub fn state(&self) -> ViewState<GeneratedQuest> {
        self.state.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<GeneratedQuest>> {
        self.state.subscribe()
    }

    pub async fn generate_quest(&self, request: &QuestGenerationRequest) -> Outcome {
        self.state
            .run("generate_quest", self.repo.generate_quest(request), describe)
            .await
    }

    /// Dismiss the error, keeping any earlier result on screen
    pub fn clear_error(&self) {
        self.state.replace_settled(|s| match s {
            ViewState::Failure { last, .. } => Some(match last {
                Some(quest) => ViewState::Success(quest.clone()),
                None => ViewState::Idle,
            }),
            _ => None,
        });
    }

    /// Forget the generated quest, abandoning any generation in flight
    pub fn clear_generated(&self) {
        self.state.reset(ViewState::Idle);
    }

    pub fn close(&self) {
        self.state.close();
    }
}

fn describe(error: &ApiError) -> String {
    match error {
        ApiError::Transport { source, .. } => format!("Network error: {}", source),
        other => format!("Failed to generate quest: {}", other),
    }
}
