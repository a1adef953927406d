//! View-state controllers
//!
//! One controller per screen. Each owns a [`ViewState`] published through a
//! `tokio::sync::watch` channel, runs operations through its repository, and
//! folds the results into that state:
//!
//! ```text
//! Idle ──▶ Loading ──▶ Success(data)
//!             ▲    └─▶ Failure(message, last data)
//!             └──────────────┘
//! ```
//!
//! Operations are plain `async fn`s. A response that arrives after a newer
//! operation started is dropped, and `close()` abandons whatever is in
//! flight. Dropping a controller closes it.

mod auth;
mod generator;
mod publisher;
mod quests;
mod state;
mod stats;
mod tasks;

pub use auth::AuthController;
pub use generator::QuestGeneratorController;
pub use publisher::Outcome;
pub use quests::QuestController;
pub use state::ViewState;
pub use stats::{ProfileStats, StatsController};
pub use tasks::{TaskController, TaskFilter, TaskSummary};
