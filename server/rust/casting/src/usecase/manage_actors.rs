use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::entity::{Actor, ActorChanges};
use crate::domain::repository::ActorRepository;
use crate::domain::value_object::{Page, PageRequest};
use crate::usecase::error::UseCaseError;
use crate::usecase::input::{optional_date, optional_text, required_date, required_text};

/// 俳優一覧の 1 ページあたりの上限。
pub const ACTORS_PER_PAGE: u32 = 10;

const NO_NAME: &str = "No name provided!";
const NO_BIRTH_DATE: &str = "No birth date provided!";
const NO_VALID_BIRTH_DATE: &str = "No valid birth date provided!";

/// ManageActorsUseCase は俳優の CRUD を担う。
pub struct ManageActorsUseCase {
    actor_repo: Arc<dyn ActorRepository>,
}

impl ManageActorsUseCase {
    pub fn new(actor_repo: Arc<dyn ActorRepository>) -> Self {
        Self { actor_repo }
    }

    /// 名前順に俳優を返す。
    pub async fn list_actors(&self, request: PageRequest) -> Result<Page<Actor>, UseCaseError> {
        let (items, total) = self.actor_repo.list(request).await?;
        let page = Page::new(items, total, request);
        if page.is_out_of_range() {
            return Err(UseCaseError::NotFound);
        }
        Ok(page)
    }

    pub async fn get_actor(&self, id: Uuid) -> Result<Actor, UseCaseError> {
        self.actor_repo
            .find_by_id(id)
            .await?
            .ok_or(UseCaseError::NotFound)
    }

    pub async fn create_actor(&self, input: &Value) -> Result<Actor, UseCaseError> {
        let name = required_text(input, "name", NO_NAME)?;
        let birth_date = required_date(input, "birth_date", NO_BIRTH_DATE)?;

        let actor = Actor::new(name, birth_date);
        self.actor_repo
            .create(&actor)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        info!(actor_id = %actor.id, "actor created");
        Ok(actor)
    }

    pub async fn replace_actor(&self, id: Uuid, input: &Value) -> Result<Actor, UseCaseError> {
        let name = required_text(input, "name", NO_NAME)?;
        let birth_date = required_date(input, "birth_date", NO_VALID_BIRTH_DATE)?;

        let mut actor = self.get_actor(id).await?;
        actor.apply(ActorChanges {
            name: Some(name),
            birth_date: Some(birth_date),
        });
        self.actor_repo
            .update(&actor)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        Ok(actor)
    }

    pub async fn patch_actor(&self, id: Uuid, input: &Value) -> Result<Actor, UseCaseError> {
        let mut actor = self.get_actor(id).await?;

        let changes = ActorChanges {
            name: optional_text(input, "name", NO_NAME)?,
            birth_date: optional_date(input, "birth_date", NO_VALID_BIRTH_DATE)?,
        };
        actor.apply(changes);
        self.actor_repo
            .update(&actor)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        Ok(actor)
    }

    /// 俳優を削除する。役が割り当てられている間は Unprocessable。
    pub async fn delete_actor(&self, id: Uuid) -> Result<(), UseCaseError> {
        self.get_actor(id).await?;
        self.actor_repo
            .delete(id)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        info!(actor_id = %id, "actor deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::actor_repository::MockActorRepository;
    use chrono::NaiveDate;
    use serde_json::json;

    fn actor(name: &str) -> Actor {
        Actor::new(name.to_string(), NaiveDate::from_ymd_opt(1949, 6, 22).unwrap())
    }

    #[tokio::test]
    async fn test_list_actors() {
        let mut mock = MockActorRepository::new();
        mock.expect_list()
            .returning(|_| Ok((vec![actor("Meryl Streep")], 1)));

        let uc = ManageActorsUseCase::new(Arc::new(mock));
        let page = uc.list_actors(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page.items[0].name, "Meryl Streep");
        assert_eq!(page.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_create_actor_messages() {
        let uc = ManageActorsUseCase::new(Arc::new(MockActorRepository::new()));

        let err = uc.create_actor(&json!({"name": ""})).await.unwrap_err();
        assert!(matches!(err, UseCaseError::Validation(m) if m == "No name provided!"));

        let err = uc
            .create_actor(&json!({"name": "Meryl Streep"}))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Validation(m) if m == "No birth date provided!"));
    }

    #[tokio::test]
    async fn test_replace_actor_message_for_invalid_date() {
        let uc = ManageActorsUseCase::new(Arc::new(MockActorRepository::new()));
        let err = uc
            .replace_actor(Uuid::new_v4(), &json!({"name": "Meryl Streep", "birth_date": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Validation(m) if m == "No valid birth date provided!"));
    }

    #[tokio::test]
    async fn test_patch_actor_birth_date() {
        let existing = actor("Meryl Streep");
        let id = existing.id;
        let mut mock = MockActorRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        mock.expect_update().returning(|_| Ok(()));

        let uc = ManageActorsUseCase::new(Arc::new(mock));
        let patched = uc
            .patch_actor(id, &json!({"birth_date": "1949-06-23"}))
            .await
            .unwrap();
        assert_eq!(patched.name, "Meryl Streep");
        assert_eq!(patched.birth_date, NaiveDate::from_ymd_opt(1949, 6, 23).unwrap());
    }

    #[tokio::test]
    async fn test_delete_actor_with_roles_is_unprocessable() {
        let existing = actor("Meryl Streep");
        let id = existing.id;
        let mut mock = MockActorRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        mock.expect_delete()
            .returning(|_| Err(anyhow::anyhow!("actor is still assigned to roles")));

        let uc = ManageActorsUseCase::new(Arc::new(mock));
        assert!(matches!(
            uc.delete_actor(id).await.unwrap_err(),
            UseCaseError::Unprocessable(_)
        ));
    }

    #[tokio::test]
    async fn test_repository_failure_on_read_is_internal() {
        let mut mock = MockActorRepository::new();
        mock.expect_find_by_id()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let uc = ManageActorsUseCase::new(Arc::new(mock));
        assert!(matches!(
            uc.get_actor(Uuid::new_v4()).await.unwrap_err(),
            UseCaseError::Internal(_)
        ));
    }
}
