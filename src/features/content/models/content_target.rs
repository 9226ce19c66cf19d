use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// Kind of content a violation report can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentKind {
    Board,
    ChatRoom,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Board => write!(f, "board"),
            ContentKind::ChatRoom => write!(f, "chat_room"),
        }
    }
}

/// The single piece of content a report refers to.
///
/// Persisted as two mutually exclusive nullable columns; in memory the tag makes
/// "exactly one target" unrepresentable otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentTarget {
    Board(i64),
    ChatRoom(i64),
}

impl ContentTarget {
    /// Build a target from the two optional ids of a request or row.
    ///
    /// Fails with `AppError::Validation` unless exactly one id is present.
    pub fn from_parts(board_id: Option<i64>, chat_room_id: Option<i64>) -> Result<Self> {
        match (board_id, chat_room_id) {
            (Some(id), None) => Ok(ContentTarget::Board(id)),
            (None, Some(id)) => Ok(ContentTarget::ChatRoom(id)),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "Report must target either a board or a chat room, not both".to_string(),
            )),
            (None, None) => Err(AppError::Validation(
                "Report must target a board or a chat room".to_string(),
            )),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentTarget::Board(_) => ContentKind::Board,
            ContentTarget::ChatRoom(_) => ContentKind::ChatRoom,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            ContentTarget::Board(id) | ContentTarget::ChatRoom(id) => *id,
        }
    }

    pub fn board_id(&self) -> Option<i64> {
        match self {
            ContentTarget::Board(id) => Some(*id),
            ContentTarget::ChatRoom(_) => None,
        }
    }

    pub fn chat_room_id(&self) -> Option<i64> {
        match self {
            ContentTarget::ChatRoom(id) => Some(*id),
            ContentTarget::Board(_) => None,
        }
    }
}

impl std::fmt::Display for ContentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.kind(), self.id())
    }
}

/// Live content row with its author, as returned by a content source
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct ContentOwner {
    pub id: i64,
    /// `None` when the author account no longer exists
    pub author_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_only_builds_board_target() {
        let target = ContentTarget::from_parts(Some(42), None).unwrap();
        assert_eq!(target, ContentTarget::Board(42));
        assert_eq!(target.board_id(), Some(42));
        assert_eq!(target.chat_room_id(), None);
    }

    #[test]
    fn test_chat_room_only_builds_chat_room_target() {
        let target = ContentTarget::from_parts(None, Some(5)).unwrap();
        assert_eq!(target.kind(), ContentKind::ChatRoom);
        assert_eq!(target.id(), 5);
    }

    #[test]
    fn test_both_targets_rejected() {
        let result = ContentTarget::from_parts(Some(1), Some(2));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_no_target_rejected() {
        let result = ContentTarget::from_parts(None, None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_display_names_kind_and_id() {
        assert_eq!(ContentTarget::ChatRoom(3).to_string(), "chat_room #3");
    }
}
