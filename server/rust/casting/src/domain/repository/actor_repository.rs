use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::Actor;
use crate::domain::value_object::PageRequest;

/// ActorRepository は俳優の永続化のためのリポジトリトレイト。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Actor>>;

    /// 名前昇順で 1 ページ分と総件数を返す。
    async fn list(&self, page: PageRequest) -> anyhow::Result<(Vec<Actor>, u64)>;

    async fn create(&self, actor: &Actor) -> anyhow::Result<()>;

    async fn update(&self, actor: &Actor) -> anyhow::Result<()>;

    /// 俳優を削除する。役が割り当てられている場合は失敗する。
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}
