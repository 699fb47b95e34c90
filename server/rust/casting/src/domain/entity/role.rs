use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 役名の最大長（文字数）。
pub const MAX_CHARACTER_LEN: usize = 100;

/// Role は映画の役。俳優は未割り当てでもよい。
/// (movie_id, character) は一意。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub character: String,
    pub actor_id: Option<Uuid>,
}

impl Role {
    pub fn new(movie_id: Uuid, character: String, actor_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            movie_id,
            character,
            actor_id,
        }
    }

    pub fn apply(&mut self, changes: RoleChanges) {
        if let Some(character) = changes.character {
            self.character = character;
        }
        match changes.actor {
            ActorAssignment::Keep => {}
            ActorAssignment::Unassign => self.actor_id = None,
            ActorAssignment::Assign(actor_id) => self.actor_id = Some(actor_id),
        }
    }
}

/// ActorAssignment は部分更新での俳優割り当ての扱い。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActorAssignment {
    #[default]
    Keep,
    Unassign,
    Assign(Uuid),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChanges {
    pub character: Option<String>,
    pub actor: ActorAssignment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_actor_assignment() {
        let actor_id = Uuid::new_v4();
        let mut role = Role::new(Uuid::new_v4(), "Rick Deckard".to_string(), Some(actor_id));

        role.apply(RoleChanges::default());
        assert_eq!(role.actor_id, Some(actor_id));

        role.apply(RoleChanges {
            character: None,
            actor: ActorAssignment::Unassign,
        });
        assert_eq!(role.actor_id, None);

        let other = Uuid::new_v4();
        role.apply(RoleChanges {
            character: Some("Roy Batty".to_string()),
            actor: ActorAssignment::Assign(other),
        });
        assert_eq!(role.actor_id, Some(other));
        assert_eq!(role.character, "Roy Batty");
    }
}
