//! In-memory store - used when no database is configured, and in tests.
//!
//! All three repositories share one set of tables behind a single async
//! `RwLock`, so every write (including the group delete that clears post
//! references) is applied atomically. Data is lost on process restart.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use yatube_core::domain::{Group, Post, User};
use yatube_core::error::RepoError;
use yatube_core::pagination::PageWindow;
use yatube_core::ports::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    groups: HashMap<Uuid, Group>,
    posts: HashMap<Uuid, Post>,
}

/// Shared in-memory tables with per-entity repository handles.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn groups(&self) -> InMemoryGroupRepository {
        InMemoryGroupRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryGroupRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        let taken = tables.users.values().any(|other| {
            other.id != user.id && (other.username == user.username || other.email == user.email)
        });
        if taken {
            return Err(RepoError::Duplicate(format!(
                "username '{}' or email already taken",
                user.username
            )));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Removing a user removes their posts as well.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.posts.retain(|_, post| post.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;

        if tables
            .groups
            .values()
            .any(|other| other.id != group.id && other.slug == group.slug)
        {
            return Err(RepoError::Duplicate(format!(
                "slug '{}'",
                group.slug
            )));
        }

        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }

    /// Removing a group clears the reference on its posts.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        if tables.groups.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::MissingReference(format!("user {}", post.author_id)));
        }
        if let Some(group_id) = post.group_id {
            if !tables.groups.contains_key(&group_id) {
                return Err(RepoError::MissingReference(format!("group {group_id}")));
            }
        }

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    /// Items and total come from under the same read guard.
    async fn find_page(
        &self,
        filter: PostFilter,
        window: PageWindow,
    ) -> Result<(Vec<Post>, u64), RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&Post> = tables.posts.values().filter(|p| filter.matches(p)).collect();
        let total = posts.len() as u64;
        posts.sort_by_key(|p| Reverse((p.created_at, p.id)));

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        let items = posts.into_iter().skip(offset).take(limit).cloned().collect();
        Ok((items, total))
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().filter(|p| filter.matches(p)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    async fn seeded() -> (InMemoryStore, User, Group) {
        let store = InMemoryStore::new();
        let user = store
            .users()
            .save(User::new("auth".into(), "auth@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let group = store
            .groups()
            .save(Group::new(
                "Test group".into(),
                "test-slug".into(),
                "Test description".into(),
            ))
            .await
            .unwrap();
        (store, user, group)
    }

    #[tokio::test]
    async fn test_find_page_orders_newest_first_with_id_tiebreak() {
        let (store, user, _) = seeded().await;
        let posts = store.posts();
        let at = Utc::now();

        let mut same_time_a = Post::new(user.id, "a".into(), None);
        let mut same_time_b = Post::new(user.id, "b".into(), None);
        same_time_a.created_at = at;
        same_time_a.id = Uuid::from_u128(1);
        same_time_b.created_at = at;
        same_time_b.id = Uuid::from_u128(2);
        let mut older = Post::new(user.id, "older".into(), None);
        older.created_at = at - Duration::seconds(5);

        for post in [older, same_time_a, same_time_b] {
            posts.save(post).await.unwrap();
        }

        let (page, total) = posts
            .find_page(
                PostFilter::All,
                PageWindow {
                    offset: 0,
                    limit: 10,
                },
            )
            .await
            .unwrap();

        let texts: Vec<_> = page.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "a", "older"]);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_group_delete_clears_post_reference() {
        let (store, user, group) = seeded().await;
        let posts = store.posts();

        let post = posts
            .save(Post::new(user.id, "grouped".into(), Some(group.id)))
            .await
            .unwrap();

        store.groups().delete(group.id).await.unwrap();

        let kept = posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(kept.group_id, None);
        assert_eq!(kept.text, "grouped");
        assert_eq!(posts.count(PostFilter::Group(group.id)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let (store, _, _) = seeded().await;

        let result = store
            .groups()
            .save(Group::new("Other".into(), "test-slug".into(), String::new()))
            .await;

        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let (store, _, _) = seeded().await;

        let result = store
            .posts()
            .save(Post::new(Uuid::new_v4(), "orphan".into(), None))
            .await;

        assert!(matches!(result, Err(RepoError::MissingReference(_))));
    }
}
