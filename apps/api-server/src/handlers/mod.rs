//! HTTP handlers and route configuration.

mod auth;
mod convert;
mod groups;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post listings
            .route("/posts", web::get().to(posts::index))
            .route("/group/{slug}", web::get().to(posts::group_posts))
            .route("/profile/{username}", web::get().to(posts::profile))
            // Single post
            .route("/create", web::post().to(posts::create))
            .route("/posts/{id}", web::get().to(posts::post_detail))
            .route("/posts/{id}/edit", web::get().to(posts::edit_form))
            .route("/posts/{id}/edit", web::post().to(posts::edit))
            // Groups
            .route("/groups", web::get().to(groups::list))
            .route("/groups", web::post().to(groups::create))
            .route("/groups/{slug}", web::delete().to(groups::delete)),
    );
}
