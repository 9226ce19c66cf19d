pub mod services;

pub use services::{MemberDirectory, PgMemberDirectory};
