//! Reading statistics.

pub mod service;

pub use service::StatsService;
