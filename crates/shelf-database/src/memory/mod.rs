//! In-memory store backend.
//!
//! All tables live in one [`MemoryState`] behind a `tokio::sync::RwLock`.
//! Intended for development, tests and single-process deployments; data is
//! lost on restart.

pub mod provider;
pub mod state;
pub mod store;

pub use provider::{MemoryStoreProvider, MemoryUnitOfWork};
pub use state::MemoryState;
pub use store::MemoryStore;
