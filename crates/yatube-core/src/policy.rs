//! Access rules for post mutation.

use uuid::Uuid;

use crate::domain::Post;

/// Only the author of a post may edit it.
pub fn can_edit(post: &Post, requesting_user_id: Uuid) -> bool {
    post.author_id == requesting_user_id
}
