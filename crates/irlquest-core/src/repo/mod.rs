//! Repositories
//!
//! Thin per-domain facades over [`ApiClient`](crate::api::ApiClient). They
//! add no caching; each call is one round-trip. The one piece of state they
//! touch is the session, which [`AuthRepository`] writes on login and clears
//! on logout.

mod auth;
mod quests;
mod tasks;
mod users;

pub use auth::AuthRepository;
pub use quests::QuestRepository;
pub use tasks::TaskRepository;
pub use users::UserRepository;
