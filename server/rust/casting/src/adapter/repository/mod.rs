pub mod actor_postgres;
pub mod in_memory;
pub mod movie_postgres;
pub mod role_postgres;

pub use actor_postgres::ActorPostgresRepository;
pub use in_memory::InMemoryCastingStore;
pub use movie_postgres::MoviePostgresRepository;
pub use role_postgres::RolePostgresRepository;

use crate::domain::value_object::PageRequest;

/// PageRequest を SQL の LIMIT / OFFSET 用の値に変換する。
pub(crate) fn limit_offset(page: PageRequest) -> anyhow::Result<(i64, i64)> {
    Ok((i64::try_from(page.limit())?, i64::try_from(page.offset())?))
}

pub(crate) fn total_count(count: i64) -> anyhow::Result<u64> {
    Ok(u64::try_from(count)?)
}
