mod member_directory;

pub use member_directory::{MemberDirectory, PgMemberDirectory};
