//! Per-user reading statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use shelf_core::error::AppError;
use shelf_database::StoreProvider;
use shelf_entity::{ReadingStats, ReadingWindows};

use crate::context::RequestContext;

/// Computes reading statistics over the caller's comics.
#[derive(Debug, Clone)]
pub struct StatsService {
    /// Store backend.
    store: Arc<dyn StoreProvider>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(store: Arc<dyn StoreProvider>) -> Self {
        Self { store }
    }

    /// Statistics with windows anchored at the current time.
    pub async fn reading_stats(&self, ctx: &RequestContext) -> Result<ReadingStats, AppError> {
        self.reading_stats_at(ctx, Utc::now()).await
    }

    /// Statistics with windows anchored at `now`.
    pub async fn reading_stats_at(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> Result<ReadingStats, AppError> {
        let windows = ReadingWindows::at(now);
        let stats = self.store.comics().reading_stats(ctx.user_id, &windows).await?;

        debug!(
            user_id = %ctx.user_id,
            total = stats.total_comics,
            read = stats.read_comics,
            "Reading stats computed"
        );

        Ok(stats)
    }
}
