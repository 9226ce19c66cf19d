use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::content::models::ContentOwner;

/// Read and soft-delete access to one kind of reportable content
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Returns the content and its author, or `None` if it is missing or already deleted
    async fn find_live(&self, id: i64) -> Result<Option<ContentOwner>>;

    /// Marks the content deleted.
    ///
    /// Must be idempotent: deleting already-deleted content succeeds without changes.
    /// Fails with `AppError::NotFound` only when no row with `id` exists at all.
    async fn soft_delete(&self, id: i64) -> Result<()>;
}
