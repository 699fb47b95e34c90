use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{limit_offset, total_count};
use crate::domain::entity::Role;
use crate::domain::repository::RoleRepository;
use crate::domain::value_object::PageRequest;

/// RolePostgresRepository はPostgreSQL実装の役リポジトリ。
pub struct RolePostgresRepository {
    pool: PgPool,
}

impl RolePostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for RolePostgresRepository {
    async fn find_in_movie(&self, movie_id: Uuid, role_id: Uuid) -> anyhow::Result<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, movie_id, character_name, actor_id
            FROM casting.roles
            WHERE id = $1 AND movie_id = $2
            "#,
        )
        .bind(role_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_movie(
        &self,
        movie_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Role>, u64)> {
        let (limit, offset) = limit_offset(page)?;

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM casting.roles WHERE movie_id = $1",
        )
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, movie_id, character_name, actor_id
            FROM casting.roles
            WHERE movie_id = $1
            ORDER BY character_name ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(movie_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total_count(count)?))
    }

    async fn list_by_actor(
        &self,
        actor_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Role>, u64)> {
        let (limit, offset) = limit_offset(page)?;

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM casting.roles WHERE actor_id = $1",
        )
        .bind(actor_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, movie_id, character_name, actor_id
            FROM casting.roles
            WHERE actor_id = $1
            ORDER BY character_name ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(actor_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total_count(count)?))
    }

    async fn create(&self, role: &Role) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO casting.roles (id, movie_id, character_name, actor_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(role.id)
        .bind(role.movie_id)
        .bind(&role.character)
        .bind(role.actor_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, role: &Role) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE casting.roles
            SET character_name = $2, actor_id = $3
            WHERE id = $1
            "#,
        )
        .bind(role.id)
        .bind(&role.character)
        .bind(role.actor_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM casting.roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// RoleRow はDB行からのマッピング用。
#[derive(sqlx::FromRow)]
struct RoleRow {
    id: Uuid,
    movie_id: Uuid,
    character_name: String,
    actor_id: Option<Uuid>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: row.id,
            movie_id: row.movie_id,
            character: row.character_name,
            actor_id: row.actor_id,
        }
    }
}
