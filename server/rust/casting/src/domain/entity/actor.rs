use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 名前の最大長（文字数）。
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
}

impl Actor {
    pub fn new(name: String, birth_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            birth_date,
        }
    }

    pub fn apply(&mut self, changes: ActorChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(birth_date) = changes.birth_date {
            self.birth_date = birth_date;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorChanges {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}
