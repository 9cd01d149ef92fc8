//! Application services composing validation, access rules and repositories.

mod groups;
mod posts;

pub use groups::GroupService;
pub use posts::{EditOutcome, PostDetail, PostListing, PostService, Profile};
