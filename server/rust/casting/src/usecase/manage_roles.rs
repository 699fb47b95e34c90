use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::entity::{ActorAssignment, Role, RoleChanges};
use crate::domain::repository::{ActorRepository, MovieRepository, RoleRepository};
use crate::domain::value_object::{Page, PageRequest};
use crate::usecase::error::UseCaseError;
use crate::usecase::input::{optional_field, optional_text, required_text, OptionalField};

/// 役一覧の 1 ページあたりの件数（上限）。
pub const ROLES_PER_PAGE: u32 = 10;

const NO_CHARACTER: &str = "No character provided!";
const ACTOR_NOT_FOUND: &str = "Actor not found!";

/// ManageRolesUseCase は映画の役と俳優の割り当てを担う。
pub struct ManageRolesUseCase {
    movie_repo: Arc<dyn MovieRepository>,
    actor_repo: Arc<dyn ActorRepository>,
    role_repo: Arc<dyn RoleRepository>,
}

impl ManageRolesUseCase {
    pub fn new(
        movie_repo: Arc<dyn MovieRepository>,
        actor_repo: Arc<dyn ActorRepository>,
        role_repo: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            movie_repo,
            actor_repo,
            role_repo,
        }
    }

    /// 映画の役を役名順に返す。
    pub async fn list_movie_roles(
        &self,
        movie_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Role>, UseCaseError> {
        self.ensure_movie(movie_id).await?;
        let (items, total) = self.role_repo.list_by_movie(movie_id, request).await?;
        into_page(items, total, request)
    }

    /// 俳優に割り当てられた役を役名順に返す。
    pub async fn list_actor_roles(
        &self,
        actor_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Role>, UseCaseError> {
        self.actor_repo
            .find_by_id(actor_id)
            .await?
            .ok_or(UseCaseError::NotFound)?;
        let (items, total) = self.role_repo.list_by_actor(actor_id, request).await?;
        into_page(items, total, request)
    }

    pub async fn get_role(&self, movie_id: Uuid, role_id: Uuid) -> Result<Role, UseCaseError> {
        self.role_repo
            .find_in_movie(movie_id, role_id)
            .await?
            .ok_or(UseCaseError::NotFound)
    }

    /// 役を作成する。actor_id が指定されていれば俳優を割り当てる。
    pub async fn create_role(&self, movie_id: Uuid, input: &Value) -> Result<Role, UseCaseError> {
        let character = required_text(input, "character", NO_CHARACTER)?;
        self.ensure_movie(movie_id).await?;

        let actor_id = match optional_field(input, "actor_id") {
            OptionalField::Absent | OptionalField::Null => None,
            OptionalField::Value(value) => Some(self.resolve_actor(value).await?),
        };

        let role = Role::new(movie_id, character, actor_id);
        self.role_repo
            .create(&role)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        info!(role_id = %role.id, movie_id = %movie_id, "role created");
        Ok(role)
    }

    /// 役を部分更新する。actor_id に null を指定すると割り当てを外す。
    pub async fn patch_role(
        &self,
        movie_id: Uuid,
        role_id: Uuid,
        input: &Value,
    ) -> Result<Role, UseCaseError> {
        let mut role = self.get_role(movie_id, role_id).await?;

        let character = optional_text(input, "character", NO_CHARACTER)?;
        let actor = match optional_field(input, "actor_id") {
            OptionalField::Absent => ActorAssignment::Keep,
            OptionalField::Null => ActorAssignment::Unassign,
            OptionalField::Value(value) => ActorAssignment::Assign(self.resolve_actor(value).await?),
        };

        role.apply(RoleChanges { character, actor });
        self.role_repo
            .update(&role)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        Ok(role)
    }

    pub async fn delete_role(&self, movie_id: Uuid, role_id: Uuid) -> Result<(), UseCaseError> {
        let role = self.get_role(movie_id, role_id).await?;
        self.role_repo
            .delete(role.id)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        info!(role_id = %role_id, movie_id = %movie_id, "role deleted");
        Ok(())
    }

    async fn ensure_movie(&self, movie_id: Uuid) -> Result<(), UseCaseError> {
        self.movie_repo
            .find_by_id(movie_id)
            .await?
            .map(|_| ())
            .ok_or(UseCaseError::NotFound)
    }

    /// actor_id の値を既存の俳優 ID に解決する。
    async fn resolve_actor(&self, value: &Value) -> Result<Uuid, UseCaseError> {
        let Some(actor_id) = value.as_str().and_then(|s| Uuid::parse_str(s).ok()) else {
            return Err(UseCaseError::validation(ACTOR_NOT_FOUND));
        };
        self.actor_repo
            .find_by_id(actor_id)
            .await?
            .map(|actor| actor.id)
            .ok_or_else(|| UseCaseError::validation(ACTOR_NOT_FOUND))
    }
}

fn into_page(items: Vec<Role>, total: u64, request: PageRequest) -> Result<Page<Role>, UseCaseError> {
    let page = Page::new(items, total, request);
    if page.is_out_of_range() {
        return Err(UseCaseError::NotFound);
    }
    Ok(page)
}
