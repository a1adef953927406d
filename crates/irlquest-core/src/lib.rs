//! IRL Quest Core Library
//!
//! Client-side core for IRL Quest, a gamified to-do service: tasks, quests,
//! and AI-generated quest suggestions backed by a REST server.
//!
//! # Architecture
//!
//! ```text
//! Controller ─▶ Repository ─▶ ApiClient ─▶ AuthPipeline ─▶ network
//!                                               │
//!                                            Session (token)
//! ```
//!
//! The session token is the only durable local state. Everything else is
//! fetched from the server on demand and held in controller view state.
//!
//! # Quick Start
//!
//! ```text
//! let app = App::open()?;
//!
//! let auth = app.auth_controller();
//! auth.login("alice", "secret").await;
//!
//! let tasks = app.task_controller();
//! tasks.create_task("Buy milk", None).await;
//! println!("{:?}", tasks.state().data());
//! ```
//!
//! # Modules
//!
//! - `app`: Wiring of session, client, repositories and controllers
//! - `session`: Token store with an explicit open/close lifecycle
//! - `api`: REST client and the bearer-token request pipeline
//! - `repo`: Per-resource repositories
//! - `view`: Screen controllers and their observable state
//! - `models`: Wire types
//! - `storage`: Atomic file persistence
//! - `config`: Application configuration

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod repo;
pub mod session;
pub mod storage;
pub mod view;

pub use api::{ApiClient, AuthPipeline};
pub use app::App;
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use models::{GeneratedQuest, Quest, Task, User};
pub use session::Session;
pub use storage::{StorageError, StorageResult};
pub use view::{Outcome, ViewState};
