pub mod models;
pub mod services;

pub use models::{ContentKind, ContentTarget};
pub use services::{BoardContentSource, ChatRoomContentSource, ContentResolver};
