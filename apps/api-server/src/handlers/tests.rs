use std::collections::HashSet;
use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use yatube_core::domain::{Group, NewGroup, PostForm, User};
use yatube_core::{PageNumber, Paginator};
use yatube_core::ports::{PasswordService, TokenService};
use yatube_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::AppState;

struct TestContext {
    state: AppState,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
    author: User,
    other: User,
    admin: User,
}

impl TestContext {
    async fn new() -> Self {
        let admins = HashSet::from(["admin".to_string()]);
        let state = AppState::in_memory(Paginator::default(), admins);

        let author = state
            .users
            .save(User::new("auth".into(), "auth@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let other = state
            .users
            .save(User::new("HasNoName".into(), "other@example.com".into(), "hash".into()))
            .await
            .unwrap();
        let admin = state
            .users
            .save(User::new("admin".into(), "admin@example.com".into(), "hash".into()))
            .await
            .unwrap();

        Self {
            state,
            tokens: Arc::new(JwtTokenService::new(JwtConfig::default())),
            passwords: Arc::new(Argon2PasswordService::new()),
            author,
            other,
            admin,
        }
    }

    fn bearer(&self, user: &User) -> (header::HeaderName, String) {
        let token = self
            .tokens
            .generate_token(user.id, &user.username, self.state.roles_for(&user.username))
            .unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    fn admin_bearer(&self) -> (header::HeaderName, String) {
        self.bearer(&self.admin)
    }

    async fn seed_group(&self) -> Group {
        self.state
            .groups
            .create_group(NewGroup {
                title: "Test group".into(),
                slug: "test-slug".into(),
                description: "Test description".into(),
            })
            .await
            .unwrap()
    }
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($ctx.state.clone()))
                .app_data(web::Data::new($ctx.tokens.clone()))
                .app_data(web::Data::new($ctx.passwords.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_public_pages_are_reachable_anonymously() {
    let ctx = TestContext::new().await;
    ctx.seed_group().await;
    let post = ctx
        .state
        .posts
        .create_post(ctx.author.id, PostForm::new("Test text", None))
        .await
        .unwrap();
    let app = app!(ctx);

    for uri in [
        "/api/health".to_string(),
        "/api/posts".to_string(),
        "/api/group/test-slug".to_string(),
        "/api/profile/auth".to_string(),
        format!("/api/posts/{}", post.id),
        "/api/groups".to_string(),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn test_unknown_resources_are_not_found() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    for uri in [
        "/api/group/missing",
        "/api/profile/nobody",
        "/api/posts/00000000-0000-0000-0000-000000000000",
        "/api/unexisting_page",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_create_requires_authentication() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/create")
        .set_json(json!({ "text": "Test text" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        ctx.state
            .posts
            .index(PageNumber::FIRST)
            .await
            .unwrap()
            .total_items,
        0
    );
}

#[actix_web::test]
async fn test_create_post_returns_created_with_location() {
    let ctx = TestContext::new().await;
    let group = ctx.seed_group().await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/create")
        .insert_header(ctx.bearer(&ctx.author))
        .set_json(json!({ "text": "Test text", "group_id": group.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = location(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["text"], "Test text");
    assert_eq!(body["author_id"], json!(ctx.author.id));
    assert_eq!(body["group_id"], json!(group.id));
    assert_eq!(location, format!("/api/posts/{}", body["id"].as_str().unwrap()));
}

#[actix_web::test]
async fn test_create_blank_post_is_rejected() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/create")
        .insert_header(ctx.bearer(&ctx.author))
        .set_json(json!({ "text": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Validation Failed");
}

#[actix_web::test]
async fn test_non_author_edit_redirects_to_post() {
    let ctx = TestContext::new().await;
    let post = ctx
        .state
        .posts
        .create_post(ctx.author.id, PostForm::new("Test text", None))
        .await
        .unwrap();
    let app = app!(ctx);
    let expected_location = format!("/api/posts/{}", post.id);

    let form = test::TestRequest::get()
        .uri(&format!("/api/posts/{}/edit", post.id))
        .insert_header(ctx.bearer(&ctx.other))
        .to_request();
    let resp = test::call_service(&app, form).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), expected_location);

    let submit = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/edit", post.id))
        .insert_header(ctx.bearer(&ctx.other))
        .set_json(json!({ "text": "Hijacked" }))
        .to_request();
    let resp = test::call_service(&app, submit).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), expected_location);

    assert_eq!(ctx.state.posts.get_post(post.id).await.unwrap().text, "Test text");
}

#[actix_web::test]
async fn test_author_edits_post() {
    let ctx = TestContext::new().await;
    let group = ctx.seed_group().await;
    let post = ctx
        .state
        .posts
        .create_post(ctx.author.id, PostForm::new("Test text", None))
        .await
        .unwrap();
    let app = app!(ctx);

    let form = test::TestRequest::get()
        .uri(&format!("/api/posts/{}/edit", post.id))
        .insert_header(ctx.bearer(&ctx.author))
        .to_request();
    let resp = test::call_service(&app, form).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["text"], "Test text");
    assert_eq!(body["groups"][0]["slug"], "test-slug");

    let submit = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/edit", post.id))
        .insert_header(ctx.bearer(&ctx.author))
        .set_json(json!({ "text": "Another test", "group_id": group.id }))
        .to_request();
    let resp = test::call_service(&app, submit).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let edited = ctx.state.posts.get_post(post.id).await.unwrap();
    assert_eq!(edited.text, "Another test");
    assert_eq!(edited.group_id, Some(group.id));
}

#[actix_web::test]
async fn test_edit_requires_authentication() {
    let ctx = TestContext::new().await;
    let post = ctx
        .state
        .posts
        .create_post(ctx.author.id, PostForm::new("Test text", None))
        .await
        .unwrap();
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}/edit", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_index_paginates_with_malformed_page_falling_back() {
    let ctx = TestContext::new().await;
    for _ in 0..13 {
        ctx.state
            .posts
            .create_post(ctx.author.id, PostForm::new("Testing paginator", None))
            .await
            .unwrap();
    }
    let app = app!(ctx);

    let cases = [("", 10, 1), ("?page=2", 3, 2), ("?page=3", 0, 3), ("?page=abc", 10, 1)];
    for (query, expected_len, expected_page) in cases {
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts{query}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["items"].as_array().unwrap().len(), expected_len, "{query}");
        assert_eq!(body["page"], expected_page, "{query}");
        assert_eq!(body["total_items"], 13);
        assert_eq!(body["total_pages"], 2);
    }
}

#[actix_web::test]
async fn test_profile_and_detail_report_post_counts() {
    let ctx = TestContext::new().await;
    let post = ctx
        .state
        .posts
        .create_post(ctx.author.id, PostForm::new("Test text", None))
        .await
        .unwrap();
    let app = app!(ctx);

    let req = test::TestRequest::get().uri("/api/profile/auth").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["author"]["username"], "auth");
    assert_eq!(body["posts_count"], 1);
    assert!(body["author"].get("password_hash").is_none());

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["post"]["text"], "Test text");
    assert_eq!(body["posts_count"], 1);
}

#[actix_web::test]
async fn test_group_admin_requires_admin_role() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);
    let payload = json!({ "title": "Cats", "slug": "cats" });

    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(ctx.bearer(&ctx.author))
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(ctx.admin_bearer())
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(ctx.admin_bearer())
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_group_delete_keeps_posts() {
    let ctx = TestContext::new().await;
    let group = ctx.seed_group().await;
    let post = ctx
        .state
        .posts
        .create_post(
            ctx.author.id,
            PostForm::new("Test text", Some(group.id)),
        )
        .await
        .unwrap();
    let app = app!(ctx);

    let req = test::TestRequest::delete()
        .uri("/api/groups/test-slug")
        .insert_header(ctx.admin_bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["post"]["group_id"], Value::Null);
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "leo",
            "email": "leo@example.com",
            "password": "correct-horse",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "leo", "password": "wrong-password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "leo", "password": "correct-horse" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "leo");
}

#[actix_web::test]
async fn test_register_rejects_taken_username() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "auth",
            "email": "fresh@example.com",
            "password": "long-enough",
        }))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}
