pub mod actor_handler;
pub mod error;
pub mod movie_handler;
pub mod role_handler;
pub mod web_handler;

use std::sync::Arc;

use axum::http::{header, Method};
use axum::middleware::from_fn;
use axum::routing::{delete, get, patch, post, put, MethodRouter};
use axum::Router;
use casting_auth::{require_permission, AuthGuard, AuthSettings};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use self::error::AppError;
use crate::domain::repository::{ActorRepository, MovieRepository, RoleRepository};
use crate::domain::value_object::Page;
use crate::infrastructure::config::WebConfig;
use crate::usecase::{ManageActorsUseCase, ManageMoviesUseCase, ManageRolesUseCase};

/// AppState はアプリケーション全体の共有状態を表す。
#[derive(Clone)]
pub struct AppState {
    pub manage_movies_uc: Arc<ManageMoviesUseCase>,
    pub manage_actors_uc: Arc<ManageActorsUseCase>,
    pub manage_roles_uc: Arc<ManageRolesUseCase>,
    pub auth_guard: AuthGuard,
    pub auth_settings: Arc<AuthSettings>,
    pub web: Arc<WebConfig>,
}

impl AppState {
    /// リポジトリからユースケースを組み立てて AppState を作成する。
    pub fn new(
        movie_repo: Arc<dyn MovieRepository>,
        actor_repo: Arc<dyn ActorRepository>,
        role_repo: Arc<dyn RoleRepository>,
        auth_guard: AuthGuard,
        auth_settings: AuthSettings,
        web: WebConfig,
    ) -> Self {
        Self {
            manage_movies_uc: Arc::new(ManageMoviesUseCase::new(movie_repo.clone())),
            manage_actors_uc: Arc::new(ManageActorsUseCase::new(actor_repo.clone())),
            manage_roles_uc: Arc::new(ManageRolesUseCase::new(movie_repo, actor_repo, role_repo)),
            auth_guard,
            auth_settings: Arc::new(auth_settings),
            web: Arc::new(web),
        }
    }
}

/// REST API ルーターを構築する。
pub fn router(state: AppState) -> Router {
    let guard = &state.auth_guard;

    let api = Router::new()
        // Movies
        .route(
            "/movies",
            guarded(get(movie_handler::list_movies), guard, "get:movie")
                .merge(guarded(post(movie_handler::create_movie), guard, "add:movie")),
        )
        .route(
            "/movies/{movie_id}",
            guarded(get(movie_handler::get_movie), guard, "get:movie")
                .merge(guarded(put(movie_handler::replace_movie), guard, "modify:movie"))
                .merge(guarded(patch(movie_handler::patch_movie), guard, "modify:movie"))
                .merge(guarded(delete(movie_handler::delete_movie), guard, "delete:movie")),
        )
        // Roles
        .route(
            "/movies/{movie_id}/roles",
            guarded(get(role_handler::list_movie_roles), guard, "get:movie")
                .merge(guarded(post(role_handler::create_role), guard, "modify:movie")),
        )
        .route(
            "/movies/{movie_id}/roles/{role_id}",
            guarded(get(role_handler::get_role), guard, "get:movie")
                .merge(guarded(patch(role_handler::patch_role), guard, "modify:movie"))
                .merge(guarded(delete(role_handler::delete_role), guard, "modify:movie")),
        )
        // Actors
        .route(
            "/actors",
            guarded(get(actor_handler::list_actors), guard, "get:actor")
                .merge(guarded(post(actor_handler::create_actor), guard, "add:actor")),
        )
        .route(
            "/actors/{actor_id}",
            guarded(get(actor_handler::get_actor), guard, "get:actor")
                .merge(guarded(put(actor_handler::replace_actor), guard, "modify:actor"))
                .merge(guarded(patch(actor_handler::patch_actor), guard, "modify:actor"))
                .merge(guarded(delete(actor_handler::delete_actor), guard, "delete:actor")),
        )
        .route(
            "/actors/{actor_id}/roles",
            guarded(get(role_handler::list_actor_roles), guard, "get:actor"),
        );

    Router::new()
        // Health / Web
        .route("/health", get(web_handler::health))
        .route("/", get(web_handler::index))
        .route("/login", get(web_handler::login))
        .route("/user-home", get(web_handler::user_home))
        .route("/logout", get(web_handler::logout))
        .nest("/api/v1", api)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// メソッド単位で権限チェックのミドルウェアを付与する。
fn guarded(
    route: MethodRouter<AppState>,
    guard: &AuthGuard,
    permission: &'static str,
) -> MethodRouter<AppState> {
    route.route_layer(from_fn(require_permission(guard.clone(), Some(permission))))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

/// パスの ID を解釈する。UUID でない場合は存在しないものとして扱う。
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found())
}

/// PaginationResponse は一覧レスポンスのページ情報。
#[derive(Debug, Serialize)]
pub struct PaginationResponse {
    pub current_page: u32,
    pub total_pages: u64,
}

impl<T> From<&Page<T>> for PaginationResponse {
    fn from(page: &Page<T>) -> Self {
        Self {
            current_page: page.page,
            total_pages: page.total_pages(),
        }
    }
}
