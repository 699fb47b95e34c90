use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::{limit_offset, total_count};
use crate::domain::entity::Movie;
use crate::domain::repository::MovieRepository;
use crate::domain::value_object::PageRequest;

/// MoviePostgresRepository はPostgreSQL実装の映画リポジトリ。
pub struct MoviePostgresRepository {
    pool: PgPool,
}

impl MoviePostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieRepository for MoviePostgresRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Movie>> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, release_date
            FROM casting.movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, page: PageRequest) -> anyhow::Result<(Vec<Movie>, u64)> {
        let (limit, offset) = limit_offset(page)?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM casting.movies")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, release_date
            FROM casting.movies
            ORDER BY title ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total_count(count)?))
    }

    async fn create(&self, movie: &Movie) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO casting.movies (id, title, release_date)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(movie.release_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, movie: &Movie) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE casting.movies
            SET title = $2, release_date = $3
            WHERE id = $1
            "#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(movie.release_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        // 役は外部キーの ON DELETE CASCADE で削除される
        sqlx::query("DELETE FROM casting.movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// MovieRow はDB行からのマッピング用。
#[derive(sqlx::FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    release_date: NaiveDate,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            release_date: row.release_date,
        }
    }
}
