//! PostgreSQL store implementations.
//!
//! SQL lives in executor-generic functions in [`collection`] and [`comic`]
//! so the pool-backed repositories and [`PgUnitOfWork`] run identical
//! statements.

pub mod collection;
pub mod comic;
pub mod provider;
pub mod transaction;

pub use collection::CollectionRepository;
pub use comic::ComicRepository;
pub use provider::PgStoreProvider;
pub use transaction::PgUnitOfWork;
