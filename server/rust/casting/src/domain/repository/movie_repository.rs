use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::Movie;
use crate::domain::value_object::PageRequest;

/// MovieRepository は映画の永続化のためのリポジトリトレイト。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Movie>>;

    /// タイトル昇順で 1 ページ分と総件数を返す。
    async fn list(&self, page: PageRequest) -> anyhow::Result<(Vec<Movie>, u64)>;

    async fn create(&self, movie: &Movie) -> anyhow::Result<()>;

    async fn update(&self, movie: &Movie) -> anyhow::Result<()>;

    /// 映画を削除する。紐づく役も削除される。
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}
