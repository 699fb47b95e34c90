use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use casting_auth::Authenticated;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::error::AppError;
use super::{parse_id, AppState, PaginationResponse};
use crate::domain::entity::Role;
use crate::domain::value_object::{Page, PageQuery, PageRequest};
use crate::usecase::manage_roles::ROLES_PER_PAGE;

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: String,
    pub movie_id: String,
    pub character: String,
    pub actor_id: Option<String>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id.to_string(),
            movie_id: role.movie_id.to_string(),
            character: role.character,
            actor_id: role.actor_id.map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListRolesResponse {
    pub roles: Vec<RoleResponse>,
    pub total_roles: u64,
    #[serde(flatten)]
    pub pagination: PaginationResponse,
}

impl From<Page<Role>> for ListRolesResponse {
    fn from(page: Page<Role>) -> Self {
        let pagination = PaginationResponse::from(&page);
        Self {
            total_roles: page.total,
            roles: page.items.into_iter().map(RoleResponse::from).collect(),
            pagination,
        }
    }
}

fn parse_ids(movie_id: &str, role_id: &str) -> Result<(Uuid, Uuid), AppError> {
    Ok((parse_id(movie_id)?, parse_id(role_id)?))
}

pub async fn list_movie_roles(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListRolesResponse>, AppError> {
    let movie_id = parse_id(&movie_id)?;
    let request = PageRequest::from_query(&query, ROLES_PER_PAGE).ok_or_else(AppError::not_found)?;

    let page = state
        .manage_roles_uc
        .list_movie_roles(movie_id, request)
        .await?;
    Ok(Json(page.into()))
}

/// 俳優の役一覧。1 ページの件数は固定で per_page は無視する。
pub async fn list_actor_roles(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListRolesResponse>, AppError> {
    let actor_id = parse_id(&actor_id)?;
    let request =
        PageRequest::with_fixed_size(&query, ROLES_PER_PAGE).ok_or_else(AppError::not_found)?;

    let page = state
        .manage_roles_uc
        .list_actor_roles(actor_id, request)
        .await?;
    Ok(Json(page.into()))
}

pub async fn get_role(
    State(state): State<AppState>,
    Path((movie_id, role_id)): Path<(String, String)>,
) -> Result<Json<RoleResponse>, AppError> {
    let (movie_id, role_id) = parse_ids(&movie_id, &role_id)?;
    let role = state.manage_roles_uc.get_role(movie_id, role_id).await?;
    Ok(Json(role.into()))
}

pub async fn create_role(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(movie_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RoleResponse>, AppError> {
    let movie_id = parse_id(&movie_id)?;
    let Json(input) = body?;
    debug!(subject = auth.subject().unwrap_or("-"), movie_id = %movie_id, "create role requested");

    let role = state.manage_roles_uc.create_role(movie_id, &input).await?;
    Ok(Json(role.into()))
}

pub async fn patch_role(
    State(state): State<AppState>,
    Path((movie_id, role_id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<RoleResponse>, AppError> {
    let (movie_id, role_id) = parse_ids(&movie_id, &role_id)?;
    let Json(input) = body?;

    let role = state
        .manage_roles_uc
        .patch_role(movie_id, role_id, &input)
        .await?;
    Ok(Json(role.into()))
}

pub async fn delete_role(
    State(state): State<AppState>,
    Path((movie_id, role_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let (movie_id, role_id) = parse_ids(&movie_id, &role_id)?;

    state.manage_roles_uc.delete_role(movie_id, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
