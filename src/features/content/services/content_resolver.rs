use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::content::models::ContentTarget;
use crate::features::content::services::ContentSource;

/// Dispatches a `ContentTarget` to the source that owns its kind of content
#[derive(Clone)]
pub struct ContentResolver {
    boards: Arc<dyn ContentSource>,
    chat_rooms: Arc<dyn ContentSource>,
}

/// A resolved report target: who wrote it and how to take it down
pub struct ContentReference {
    pub target: ContentTarget,
    pub author_member_id: Option<i64>,
    source: Arc<dyn ContentSource>,
}

impl ContentReference {
    /// Soft delete the referenced content (idempotent)
    pub async fn delete(&self) -> Result<()> {
        self.source.soft_delete(self.target.id()).await
    }
}

impl ContentResolver {
    pub fn new(boards: Arc<dyn ContentSource>, chat_rooms: Arc<dyn ContentSource>) -> Self {
        Self { boards, chat_rooms }
    }

    fn source_for(&self, target: ContentTarget) -> &Arc<dyn ContentSource> {
        match target {
            ContentTarget::Board(_) => &self.boards,
            ContentTarget::ChatRoom(_) => &self.chat_rooms,
        }
    }

    /// Look up live content and its author.
    ///
    /// Fails with `AppError::NotFound` when the content does not exist or is already deleted.
    pub async fn resolve(&self, target: ContentTarget) -> Result<ContentReference> {
        let source = self.source_for(target);

        let owner = source
            .find_live(target.id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content {} not found", target)))?;

        Ok(ContentReference {
            target,
            author_member_id: owner.author_id,
            source: Arc::clone(source),
        })
    }

    /// Reference to `target` without requiring the content to still be live.
    ///
    /// Adjudication may race with the author deleting their own content, so this
    /// skips the lookup and relies on the source's idempotent delete. The author is unknown.
    pub fn reference(&self, target: ContentTarget) -> ContentReference {
        ContentReference {
            target,
            author_member_id: None,
            source: Arc::clone(self.source_for(target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::InMemoryContentSource;

    fn resolver() -> (ContentResolver, Arc<InMemoryContentSource>, Arc<InMemoryContentSource>) {
        let boards = Arc::new(InMemoryContentSource::new());
        let chat_rooms = Arc::new(InMemoryContentSource::new());
        boards.insert(42, Some(9));
        chat_rooms.insert(42, Some(11));
        (
            ContentResolver::new(boards.clone(), chat_rooms.clone()),
            boards,
            chat_rooms,
        )
    }

    #[tokio::test]
    async fn test_resolve_dispatches_on_kind() {
        let (resolver, _, _) = resolver();

        let board = resolver.resolve(ContentTarget::Board(42)).await.unwrap();
        let room = resolver.resolve(ContentTarget::ChatRoom(42)).await.unwrap();

        assert_eq!(board.author_member_id, Some(9));
        assert_eq!(room.author_member_id, Some(11));
    }

    #[tokio::test]
    async fn test_resolve_missing_content_is_not_found() {
        let (resolver, _, _) = resolver();

        let result = resolver.resolve(ContentTarget::Board(1)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_deleted_content_is_not_found() {
        let (resolver, boards, _) = resolver();
        boards.soft_delete(42).await.unwrap();

        let result = resolver.resolve(ContentTarget::Board(42)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reference_delete_only_touches_its_target() {
        let (resolver, boards, chat_rooms) = resolver();

        let reference = resolver.resolve(ContentTarget::Board(42)).await.unwrap();
        reference.delete().await.unwrap();

        assert!(boards.is_deleted(42));
        assert!(!chat_rooms.is_deleted(42));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (resolver, boards, _) = resolver();
        let reference = resolver.reference(ContentTarget::Board(42));

        reference.delete().await.unwrap();
        reference.delete().await.unwrap();

        assert!(boards.is_deleted(42));
        assert_eq!(boards.delete_calls(42), 2);
    }

    #[tokio::test]
    async fn test_unchecked_reference_reaches_deleted_content() {
        let (resolver, _, chat_rooms) = resolver();
        chat_rooms.soft_delete(42).await.unwrap();

        let reference = resolver.reference(ContentTarget::ChatRoom(42));

        assert_eq!(reference.author_member_id, None);
        assert!(reference.delete().await.is_ok());
        assert!(resolver.reference(ContentTarget::ChatRoom(7)).delete().await.is_err());
    }
}
