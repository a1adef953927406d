use tokio::sync::watch;

use super::publisher::{with_fallback, Outcome, StatePublisher};
use super::state::ViewState;
use crate::error::ApiError;
use crate::models::{Achievement, UserStats};
use crate::repo::UserRepository;

/// Everything the profile screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStats {
    pub stats: UserStats,
    pub achievements: Vec<Achievement>,
}

/// Profile screen
#[derive(Debug)]
pub struct StatsController {
    repo: UserRepository,
    state: StatePublisher<ProfileStats>,
}

impl StatsController {
    pub fn new(repo: UserRepository) -> Self {
        Self {
            repo,
            state: StatePublisher::new(),
        }
    }

    pub fn state(&self) -> ViewState<ProfileStats> {
        self.state.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<ProfileStats>> {
        self.state.subscribe()
    }

    /// Fetch stats and achievements together; either failing fails the load
    pub async fn load(&self) -> Outcome {
        let op = async {
            let (stats, achievements) =
                tokio::try_join!(self.repo.stats(), self.repo.achievements())?;
            Ok::<_, ApiError>(ProfileStats {
                stats,
                achievements,
            })
        };
        self.state
            .run("load_stats", op, with_fallback("Failed to load stats"))
            .await
    }

    pub fn close(&self) {
        self.state.close();
    }
}
