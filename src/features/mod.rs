pub mod auth;
pub mod content;
pub mod members;
pub mod violations;
