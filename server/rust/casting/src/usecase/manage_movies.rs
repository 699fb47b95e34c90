use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::entity::{Movie, MovieChanges};
use crate::domain::repository::MovieRepository;
use crate::domain::value_object::{Page, PageRequest};
use crate::usecase::error::UseCaseError;
use crate::usecase::input::{optional_date, optional_text, required_date, required_text};

/// 映画一覧の 1 ページあたりの上限。
pub const MOVIES_PER_PAGE: u32 = 10;

const NO_TITLE: &str = "No title provided!";
const NO_RELEASE_DATE: &str = "No valid release date provided!";

/// ManageMoviesUseCase は映画の CRUD を担う。
pub struct ManageMoviesUseCase {
    movie_repo: Arc<dyn MovieRepository>,
}

impl ManageMoviesUseCase {
    pub fn new(movie_repo: Arc<dyn MovieRepository>) -> Self {
        Self { movie_repo }
    }

    /// タイトル順に映画を返す。
    pub async fn list_movies(&self, request: PageRequest) -> Result<Page<Movie>, UseCaseError> {
        let (items, total) = self.movie_repo.list(request).await?;
        let page = Page::new(items, total, request);
        if page.is_out_of_range() {
            return Err(UseCaseError::NotFound);
        }
        Ok(page)
    }

    pub async fn get_movie(&self, id: Uuid) -> Result<Movie, UseCaseError> {
        self.movie_repo
            .find_by_id(id)
            .await?
            .ok_or(UseCaseError::NotFound)
    }

    pub async fn create_movie(&self, input: &Value) -> Result<Movie, UseCaseError> {
        let title = required_text(input, "title", NO_TITLE)?;
        let release_date = required_date(input, "release_date", NO_RELEASE_DATE)?;

        let movie = Movie::new(title, release_date);
        self.movie_repo
            .create(&movie)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        info!(movie_id = %movie.id, "movie created");
        Ok(movie)
    }

    /// 映画を置き換える。入力の検証は存在確認より先に行う。
    pub async fn replace_movie(&self, id: Uuid, input: &Value) -> Result<Movie, UseCaseError> {
        let title = required_text(input, "title", NO_TITLE)?;
        let release_date = required_date(input, "release_date", NO_RELEASE_DATE)?;

        let mut movie = self.get_movie(id).await?;
        movie.apply(MovieChanges {
            title: Some(title),
            release_date: Some(release_date),
        });
        self.movie_repo
            .update(&movie)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        Ok(movie)
    }

    /// 指定されたフィールドのみ更新する。
    pub async fn patch_movie(&self, id: Uuid, input: &Value) -> Result<Movie, UseCaseError> {
        let mut movie = self.get_movie(id).await?;

        let changes = MovieChanges {
            title: optional_text(input, "title", NO_TITLE)?,
            release_date: optional_date(input, "release_date", NO_RELEASE_DATE)?,
        };
        movie.apply(changes);
        self.movie_repo
            .update(&movie)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        Ok(movie)
    }

    /// 映画と、その映画の役をすべて削除する。
    pub async fn delete_movie(&self, id: Uuid) -> Result<(), UseCaseError> {
        self.get_movie(id).await?;
        self.movie_repo
            .delete(id)
            .await
            .map_err(UseCaseError::Unprocessable)?;

        info!(movie_id = %id, "movie deleted");
        Ok(())
    }
}
