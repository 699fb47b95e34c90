use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::{limit_offset, total_count};
use crate::domain::entity::Actor;
use crate::domain::repository::ActorRepository;
use crate::domain::value_object::PageRequest;

/// ActorPostgresRepository はPostgreSQL実装の俳優リポジトリ。
pub struct ActorPostgresRepository {
    pool: PgPool,
}

impl ActorPostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActorRepository for ActorPostgresRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Actor>> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name, birth_date
            FROM casting.actors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, page: PageRequest) -> anyhow::Result<(Vec<Actor>, u64)> {
        let (limit, offset) = limit_offset(page)?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM casting.actors")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name, birth_date
            FROM casting.actors
            ORDER BY name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total_count(count)?))
    }

    async fn create(&self, actor: &Actor) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO casting.actors (id, name, birth_date)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(actor.id)
        .bind(&actor.name)
        .bind(actor.birth_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, actor: &Actor) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE casting.actors
            SET name = $2, birth_date = $3
            WHERE id = $1
            "#,
        )
        .bind(actor.id)
        .bind(&actor.name)
        .bind(actor.birth_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        // 役が残っている場合は ON DELETE RESTRICT により失敗する
        sqlx::query("DELETE FROM casting.actors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// ActorRow はDB行からのマッピング用。
#[derive(sqlx::FromRow)]
struct ActorRow {
    id: Uuid,
    name: String,
    birth_date: NaiveDate,
}

impl From<ActorRow> for Actor {
    fn from(row: ActorRow) -> Self {
        Actor {
            id: row.id,
            name: row.name,
            birth_date: row.birth_date,
        }
    }
}
