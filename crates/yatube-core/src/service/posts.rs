use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Group, Post, PostForm, User};
use crate::error::{DomainError, RepoError, ValidationError};
use crate::pagination::{Page, PageNumber, Paginator};
use crate::policy::can_edit;
use crate::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};
use crate::validation::validate_text;

/// Which collection a listing draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostListing {
    All,
    ByGroup(String),
    ByAuthor(String),
}

/// Result of an edit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(Post),
    /// The requester is not the author; send them to the post instead.
    Redirect { post_id: Uuid },
}

/// An author's page of posts.
#[derive(Debug, Clone)]
pub struct Profile {
    pub author: User,
    pub page: Page<Post>,
    pub post_count: u64,
}

/// A single post with its author's total number of posts.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub author: Option<User>,
    pub author_post_count: u64,
}

/// The only component allowed to write posts.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    paginator: Paginator,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        paginator: Paginator,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            paginator,
        }
    }

    pub fn paginator(&self) -> Paginator {
        self.paginator
    }

    /// Validate and persist a new post for an existing author.
    pub async fn create_post(&self, author_id: Uuid, form: PostForm) -> Result<Post, DomainError> {
        validate_text(&form.text)?;

        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found("user", author_id));
        }
        self.ensure_group(form.group_id).await?;

        let post = Post::new(author_id, form.text, form.group_id);
        let post = self.persist(post).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, group_id = ?post.group_id, "Post created");
        Ok(post)
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Edit a post's text and group.
    ///
    /// A requester who is not the author gets `EditOutcome::Redirect` and
    /// the post is left untouched.
    pub async fn edit_post(
        &self,
        post_id: Uuid,
        requesting_user_id: Uuid,
        form: PostForm,
    ) -> Result<EditOutcome, DomainError> {
        let mut post = self.get_post(post_id).await?;

        if !can_edit(&post, requesting_user_id) {
            tracing::debug!(post_id = %post_id, user_id = %requesting_user_id, "Edit by non-author redirected");
            return Ok(EditOutcome::Redirect { post_id });
        }

        validate_text(&form.text)?;
        self.ensure_group(form.group_id).await?;

        post.apply(form);
        let post = self.persist(post).await?;

        tracing::info!(post_id = %post.id, "Post edited");
        Ok(EditOutcome::Updated(post))
    }

    /// List posts newest first; unknown groups and authors are `NotFound`,
    /// pages past the end are empty.
    pub async fn list_posts(
        &self,
        listing: PostListing,
        page: PageNumber,
    ) -> Result<Page<Post>, DomainError> {
        let filter = match listing {
            PostListing::All => PostFilter::All,
            PostListing::ByGroup(slug) => PostFilter::Group(self.group_by_slug(&slug).await?.id),
            PostListing::ByAuthor(username) => {
                PostFilter::Author(self.author_by_username(&username).await?.id)
            }
        };

        self.page_of(filter, page).await
    }

    /// All posts, newest first.
    pub async fn index(&self, page: PageNumber) -> Result<Page<Post>, DomainError> {
        self.page_of(PostFilter::All, page).await
    }

    pub async fn group_posts(
        &self,
        slug: &str,
        page: PageNumber,
    ) -> Result<(Group, Page<Post>), DomainError> {
        let group = self.group_by_slug(slug).await?;
        let posts = self.page_of(PostFilter::Group(group.id), page).await?;
        Ok((group, posts))
    }

    pub async fn profile(&self, username: &str, page: PageNumber) -> Result<Profile, DomainError> {
        let author = self.author_by_username(username).await?;
        let page = self.page_of(PostFilter::Author(author.id), page).await?;

        Ok(Profile {
            post_count: page.total_items,
            author,
            page,
        })
    }

    pub async fn post_detail(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.get_post(post_id).await?;
        let author = self.users.find_by_id(post.author_id).await?;
        let author_post_count = self.posts.count(PostFilter::Author(post.author_id)).await?;

        Ok(PostDetail {
            post,
            author,
            author_post_count,
        })
    }

    async fn page_of(&self, filter: PostFilter, page: PageNumber) -> Result<Page<Post>, DomainError> {
        let (items, total) = self
            .posts
            .find_page(filter, self.paginator.window(page))
            .await?;

        Ok(self.paginator.assemble(page, items, total))
    }

    async fn group_by_slug(&self, slug: &str) -> Result<Group, DomainError> {
        self.groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))
    }

    async fn author_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }

    /// Save a post; a group removed after `ensure_group` still reads as an
    /// unknown group.
    async fn persist(&self, post: Post) -> Result<Post, DomainError> {
        let group_id = post.group_id;
        let author_id = post.author_id;

        self.posts.save(post).await.map_err(|err| match (err, group_id) {
            (RepoError::MissingReference(_), Some(group_id)) => {
                DomainError::from(ValidationError::UnknownGroup(group_id))
            }
            (RepoError::MissingReference(_), None) => DomainError::not_found("user", author_id),
            (err, _) => err.into(),
        })
    }

    async fn ensure_group(&self, group_id: Option<Uuid>) -> Result<(), DomainError> {
        let Some(group_id) = group_id else {
            return Ok(());
        };

        match self.groups.find_by_id(group_id).await? {
            Some(_) => Ok(()),
            None => Err(ValidationError::UnknownGroup(group_id).into()),
        }
    }
}
