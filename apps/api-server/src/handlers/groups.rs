//! Group handlers. Writes are restricted to the `admin` role.

use actix_web::{HttpResponse, web};

use yatube_core::domain::NewGroup;
use yatube_shared::ApiResponse;
use yatube_shared::dto::{CreateGroupRequest, GroupResponse};

use super::convert;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/groups
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let groups: Vec<GroupResponse> = state
        .groups
        .list_groups()
        .await?
        .into_iter()
        .map(convert::group)
        .collect();

    Ok(HttpResponse::Ok().json(groups))
}

/// POST /api/groups - Admin only
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateGroupRequest>,
) -> AppResult<HttpResponse> {
    if !identity.is_admin() {
        return Err(AppError::Forbidden);
    }

    let req = body.into_inner();
    let group = state
        .groups
        .create_group(NewGroup {
            title: req.title,
            slug: req.slug,
            description: req.description,
        })
        .await?;

    Ok(HttpResponse::Created().json(convert::group(group)))
}

/// DELETE /api/groups/{slug} - Admin only
///
/// Posts in the group are kept and lose their group reference.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    if !identity.is_admin() {
        return Err(AppError::Forbidden);
    }

    let slug = path.into_inner();
    state.groups.delete_group(&slug).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(slug, "Group deleted")))
}
