use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a single authored text entry, optionally assigned to a group.
///
/// Only `text` and `group_id` change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
}

impl Post {
    /// Create a new post stamped with the current time.
    ///
    /// Ids are UUIDv7 so they sort in creation order.
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::now_v7(),
            text,
            created_at: Utc::now(),
            author_id,
            group_id,
        }
    }

    /// Apply an edit form: replaces the text and the group, nothing else.
    pub fn apply(&mut self, form: PostForm) {
        self.text = form.text;
        self.group_id = form.group_id;
    }
}

/// The user-editable fields of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    pub text: String,
    #[serde(default)]
    pub group_id: Option<Uuid>,
}

impl PostForm {
    pub fn new(text: impl Into<String>, group_id: Option<Uuid>) -> Self {
        Self {
            text: text.into(),
            group_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_touches_text_and_group() {
        let author_id = Uuid::new_v4();
        let mut post = Post::new(author_id, "First".to_string(), None);
        let before = post.clone();
        let group_id = Uuid::new_v4();

        post.apply(PostForm::new("Second", Some(group_id)));

        assert_eq!(post.text, "Second");
        assert_eq!(post.group_id, Some(group_id));
        assert_eq!(post.id, before.id);
        assert_eq!(post.created_at, before.created_at);
        assert_eq!(post.author_id, author_id);
    }

    #[test]
    fn test_ids_follow_creation_order() {
        let author_id = Uuid::new_v4();
        let first = Post::new(author_id, "a".to_string(), None);
        let second = Post::new(author_id, "b".to_string(), None);

        assert!(second.id > first.id);
    }
}
