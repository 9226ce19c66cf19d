use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};

/// Lookup of registered members
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Whether an active (not withdrawn) member with `member_id` exists
    async fn exists(&self, member_id: i64) -> Result<bool>;
}

pub struct PgMemberDirectory {
    pool: PgPool,
}

impl PgMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for PgMemberDirectory {
    async fn exists(&self, member_id: i64) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM members WHERE id = $1 AND deleted_at IS NULL
            )
            "#,
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check member {}: {:?}", member_id, e);
            AppError::Database(e)
        })
    }
}
