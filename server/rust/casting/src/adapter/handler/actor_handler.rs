use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use casting_auth::Authenticated;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::AppError;
use super::{parse_id, AppState, PaginationResponse};
use crate::domain::entity::Actor;
use crate::domain::value_object::{format_date, PageQuery, PageRequest};
use crate::usecase::manage_actors::ACTORS_PER_PAGE;

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub id: String,
    pub name: String,
    pub birth_date: String,
}

impl From<Actor> for ActorResponse {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id.to_string(),
            name: actor.name,
            birth_date: format_date(actor.birth_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListActorsResponse {
    pub actors: Vec<ActorResponse>,
    pub total_actors: u64,
    #[serde(flatten)]
    pub pagination: PaginationResponse,
}

pub async fn list_actors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListActorsResponse>, AppError> {
    let request = PageRequest::from_query(&query, ACTORS_PER_PAGE).ok_or_else(AppError::not_found)?;
    let page = state.manage_actors_uc.list_actors(request).await?;

    let pagination = PaginationResponse::from(&page);
    Ok(Json(ListActorsResponse {
        total_actors: page.total,
        actors: page.items.into_iter().map(ActorResponse::from).collect(),
        pagination,
    }))
}

pub async fn get_actor(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
) -> Result<Json<ActorResponse>, AppError> {
    let id = parse_id(&actor_id)?;
    let actor = state.manage_actors_uc.get_actor(id).await?;
    Ok(Json(actor.into()))
}

pub async fn create_actor(
    State(state): State<AppState>,
    auth: Authenticated,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ActorResponse>, AppError> {
    let Json(input) = body?;
    debug!(subject = auth.subject().unwrap_or("-"), "create actor requested");

    let actor = state.manage_actors_uc.create_actor(&input).await?;
    Ok(Json(actor.into()))
}

pub async fn replace_actor(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ActorResponse>, AppError> {
    let id = parse_id(&actor_id)?;
    let Json(input) = body?;

    let actor = state.manage_actors_uc.replace_actor(id, &input).await?;
    Ok(Json(actor.into()))
}

pub async fn patch_actor(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ActorResponse>, AppError> {
    let id = parse_id(&actor_id)?;
    let Json(input) = body?;

    let actor = state.manage_actors_uc.patch_actor(id, &input).await?;
    Ok(Json(actor.into()))
}

pub async fn delete_actor(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(actor_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&actor_id)?;
    debug!(subject = auth.subject().unwrap_or("-"), actor_id = %id, "delete actor requested");

    state.manage_actors_uc.delete_actor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
