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
use crate::domain::entity::Movie;
use crate::domain::value_object::{format_date, PageQuery, PageRequest};
use crate::usecase::manage_movies::MOVIES_PER_PAGE;

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub release_date: String,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id.to_string(),
            title: movie.title,
            release_date: format_date(movie.release_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListMoviesResponse {
    pub movies: Vec<MovieResponse>,
    pub total_movies: u64,
    #[serde(flatten)]
    pub pagination: PaginationResponse,
}

pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListMoviesResponse>, AppError> {
    let request = PageRequest::from_query(&query, MOVIES_PER_PAGE).ok_or_else(AppError::not_found)?;
    let page = state.manage_movies_uc.list_movies(request).await?;

    let pagination = PaginationResponse::from(&page);
    Ok(Json(ListMoviesResponse {
        total_movies: page.total,
        movies: page.items.into_iter().map(MovieResponse::from).collect(),
        pagination,
    }))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<Json<MovieResponse>, AppError> {
    let id = parse_id(&movie_id)?;
    let movie = state.manage_movies_uc.get_movie(id).await?;
    Ok(Json(movie.into()))
}

pub async fn create_movie(
    State(state): State<AppState>,
    auth: Authenticated,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MovieResponse>, AppError> {
    let Json(input) = body?;
    debug!(subject = auth.subject().unwrap_or("-"), "create movie requested");

    let movie = state.manage_movies_uc.create_movie(&input).await?;
    Ok(Json(movie.into()))
}

pub async fn replace_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MovieResponse>, AppError> {
    let id = parse_id(&movie_id)?;
    let Json(input) = body?;

    let movie = state.manage_movies_uc.replace_movie(id, &input).await?;
    Ok(Json(movie.into()))
}

pub async fn patch_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MovieResponse>, AppError> {
    let id = parse_id(&movie_id)?;
    let Json(input) = body?;

    let movie = state.manage_movies_uc.patch_movie(id, &input).await?;
    Ok(Json(movie.into()))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(movie_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&movie_id)?;
    debug!(subject = auth.subject().unwrap_or("-"), movie_id = %id, "delete movie requested");

    state.manage_movies_uc.delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
