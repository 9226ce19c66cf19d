mod content_target;

pub use content_target::{ContentKind, ContentOwner, ContentTarget};
