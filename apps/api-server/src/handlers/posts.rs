//! Post handlers: listings, detail, create and edit.

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use yatube_core::domain::PostForm;
use yatube_core::policy::can_edit;
use yatube_core::{EditOutcome, PageNumber};
use yatube_shared::dto::{
    GroupPostsResponse, PageQuery, PostDetailResponse, PostEditFormResponse, PostFormRequest,
    ProfileResponse,
};

use super::convert;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn page_number(query: &PageQuery) -> PageNumber {
    PageNumber::parse(query.page.as_deref())
}

fn post_location(post_id: Uuid) -> String {
    format!("/api/posts/{post_id}")
}

fn redirect_to_post(post_id: Uuid) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, post_location(post_id)))
        .finish()
}

/// GET /api/posts?page=
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.index(page_number(&query)).await?;

    Ok(HttpResponse::Ok().json(convert::post_page(page)))
}

/// GET /api/group/{slug}?page=
pub async fn group_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (group, page) = state
        .posts
        .group_posts(&path.into_inner(), page_number(&query))
        .await?;

    Ok(HttpResponse::Ok().json(GroupPostsResponse {
        group: convert::group(group),
        posts: convert::post_page(page),
    }))
}

/// GET /api/profile/{username}?page=
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let profile = state
        .posts
        .profile(&path.into_inner(), page_number(&query))
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        author: convert::user(profile.author),
        posts_count: profile.post_count,
        posts: convert::post_page(profile.page),
    }))
}

/// GET /api/posts/{id}
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.post_detail(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: convert::post(detail.post),
        author: detail.author.map(convert::user),
        posts_count: detail.author_post_count,
    }))
}

/// POST /api/create - Protected route
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostFormRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create_post(identity.user_id, PostForm::new(req.text, req.group_id))
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, post_location(post.id)))
        .json(convert::post(post)))
}

/// GET /api/posts/{id}/edit - Protected route
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(path.into_inner()).await?;

    if !can_edit(&post, identity.user_id) {
        return Ok(redirect_to_post(post.id));
    }

    let groups = state.groups.list_groups().await?;

    Ok(HttpResponse::Ok().json(PostEditFormResponse {
        post: convert::post(post),
        groups: groups.into_iter().map(convert::group).collect(),
    }))
}

/// POST /api/posts/{id}/edit - Protected route
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostFormRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let outcome = state
        .posts
        .edit_post(
            path.into_inner(),
            identity.user_id,
            PostForm::new(req.text, req.group_id),
        )
        .await?;

    Ok(match outcome {
        EditOutcome::Updated(post) => HttpResponse::Ok().json(convert::post(post)),
        EditOutcome::Redirect { post_id } => redirect_to_post(post_id),
    })
}
