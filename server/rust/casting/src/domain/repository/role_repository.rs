use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::Role;
use crate::domain::value_object::PageRequest;

/// RoleRepository は役の永続化のためのリポジトリトレイト。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// 指定映画に属する役を ID で検索する。
    async fn find_in_movie(&self, movie_id: Uuid, role_id: Uuid) -> anyhow::Result<Option<Role>>;

    /// 映画の役を役名昇順で返す。
    async fn list_by_movie(
        &self,
        movie_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Role>, u64)>;

    /// 俳優に割り当てられた役を役名昇順で返す。
    async fn list_by_actor(
        &self,
        actor_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Role>, u64)>;

    /// 役を作成する。(movie_id, character) が重複する場合は失敗する。
    async fn create(&self, role: &Role) -> anyhow::Result<()>;

    async fn update(&self, role: &Role) -> anyhow::Result<()>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}
