mod board_source;
mod chat_room_source;
mod content_resolver;
mod content_source;

pub use board_source::BoardContentSource;
pub use chat_room_source::ChatRoomContentSource;
pub use content_resolver::ContentResolver;
pub use content_source::ContentSource;
