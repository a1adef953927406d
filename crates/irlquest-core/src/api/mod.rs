//! REST client for the IRL Quest server
//!
//! ## Usage
//!
//! ```ignore
//! let session = Arc::new(Session::open(config.session_path())?);
//! let client = ApiClient::new(&config, session)?;
//! let tasks = client.list_tasks().await?;
//! ```

mod client;
mod pipeline;

pub use client::ApiClient;
pub use pipeline::AuthPipeline;
