//! Local storage layer
//!
//! The client keeps exactly one piece of durable state: the session token,
//! stored as a single file in the data directory. Everything else lives on
//! the server and is re-fetched on demand.

pub mod error;
pub mod persistence;

pub use error::{FileOp, StorageError, StorageResult};
pub use persistence::{atomic_write, TokenFile};
