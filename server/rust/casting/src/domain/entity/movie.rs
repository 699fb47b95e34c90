use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// タイトルの最大長（文字数）。
pub const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub release_date: NaiveDate,
}

impl Movie {
    pub fn new(title: String, release_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            release_date,
        }
    }

    pub fn apply(&mut self, changes: MovieChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(release_date) = changes.release_date {
            self.release_date = release_date;
        }
    }
}

/// MovieChanges は部分更新で変更するフィールド。None は変更しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
}
