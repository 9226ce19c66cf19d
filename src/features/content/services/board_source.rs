use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::content::models::ContentOwner;
use crate::features::content::services::ContentSource;

/// Board posts stored in the `boards` table
pub struct BoardContentSource {
    pool: PgPool,
}

impl BoardContentSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentSource for BoardContentSource {
    async fn find_live(&self, id: i64) -> Result<Option<ContentOwner>> {
        sqlx::query_as::<_, ContentOwner>(
            r#"
            SELECT id, author_id
            FROM boards
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load board {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn soft_delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE boards
            SET deleted_at = COALESCE(deleted_at, NOW())
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to soft delete board {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Board {} not found", id)));
        }

        tracing::info!("Board soft deleted: id={}", id);
        Ok(())
    }
}
