//! Domain to DTO conversions.

use yatube_core::Page;
use yatube_core::domain::{Group, Post, User};
use yatube_shared::dto::{GroupResponse, PageResponse, PostResponse, UserResponse};

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        text: post.text,
        created_at: post.created_at,
        author_id: post.author_id,
        group_id: post.group_id,
    }
}

pub fn group(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

/// Public view of a user; the password hash and email stay behind.
pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
    }
}

pub fn post_page(page: Page<Post>) -> PageResponse<PostResponse> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(post);

    PageResponse {
        items: page.items,
        page: page.number,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next,
        has_previous,
    }
}
