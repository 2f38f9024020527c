//! Completion of units of work.

use tracing::warn;

use shelf_core::result::AppResult;
use shelf_database::UnitOfWork;

/// Commit `unit` when `result` is `Ok`, roll it back otherwise.
pub(crate) async fn finish<T>(unit: Box<dyn UnitOfWork>, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            unit.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = unit.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back unit of work");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::testing::{ctx, memory_store};
    use shelf_core::error::AppError;
    use shelf_entity::{Collection, CreateCollection, ParentFilter};

    async fn create_then(atomic: bool, fail: bool) -> usize {
        let store = memory_store(atomic);
        let ctx = ctx();
        let unit = store.begin().await.unwrap();

        let record = Collection::from_create(
            CreateCollection::named(ctx.user_id, None, "Half done"),
            Utc::now(),
        );
        let result = match unit.collections().create(&record).await {
            Ok(_) if fail => Err(AppError::internal("step two failed")),
            other => other.map(|_| ()),
        };
        let _ = finish(unit, result).await;

        store
            .collections()
            .list(ctx.user_id, ParentFilter::All)
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_atomic_failure_discards_earlier_steps() {
        assert_eq!(create_then(true, true).await, 0);
        assert_eq!(create_then(true, false).await, 1);
    }

    #[tokio::test]
    async fn test_non_atomic_failure_keeps_earlier_steps() {
        assert_eq!(create_then(false, true).await, 1);
    }
}
