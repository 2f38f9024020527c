//! # shelf-database
//!
//! Persistence for comic-shelf. Services see only the traits in [`store`];
//! two backends implement them:
//!
//! - **postgres**: sqlx repositories over a [`DatabasePool`], with real
//!   transactions for units of work
//! - **memory**: a single `RwLock`-guarded table set, with snapshot/commit
//!   units of work
//!
//! [`StoreManager`] selects the backend from configuration.

pub mod connection;
pub mod manager;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use manager::StoreManager;
pub use store::{CollectionStore, ComicStore, StoreProvider, UnitOfWork};
