use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::content::models::ContentOwner;
use crate::features::content::services::ContentSource;

/// Chat rooms stored in the `chat_rooms` table; the room owner is its author
pub struct ChatRoomContentSource {
    pool: PgPool,
}

impl ChatRoomContentSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentSource for ChatRoomContentSource {
    async fn find_live(&self, id: i64) -> Result<Option<ContentOwner>> {
        sqlx::query_as::<_, ContentOwner>(
            r#"
            SELECT id, owner_id AS author_id
            FROM chat_rooms
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load chat room {}: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn soft_delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE chat_rooms
            SET deleted_at = COALESCE(deleted_at, NOW())
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to soft delete chat room {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Chat room {} not found", id)));
        }

        tracing::info!("Chat room soft deleted: id={}", id);
        Ok(())
    }
}
