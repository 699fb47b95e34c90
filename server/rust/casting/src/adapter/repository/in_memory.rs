use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::actor::MAX_NAME_LEN;
use crate::domain::entity::movie::MAX_TITLE_LEN;
use crate::domain::entity::role::MAX_CHARACTER_LEN;
use crate::domain::entity::{Actor, Movie, Role};
use crate::domain::repository::{ActorRepository, MovieRepository, RoleRepository};
use crate::domain::value_object::PageRequest;

/// InMemoryCastingStore は映画・俳優・役をまとめて保持するインメモリストア。
/// PostgreSQL スキーマと同じ制約（文字数、役名の一意性、カスケード削除、削除制限）を課す。
#[derive(Default)]
pub struct InMemoryCastingStore {
    state: RwLock<CastingState>,
}

#[derive(Default)]
struct CastingState {
    movies: HashMap<Uuid, Movie>,
    actors: HashMap<Uuid, Actor>,
    roles: HashMap<Uuid, Role>,
}

impl InMemoryCastingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CastingState {
    fn check_role(&self, role: &Role) -> anyhow::Result<()> {
        check_len("character", &role.character, MAX_CHARACTER_LEN)?;
        if !self.movies.contains_key(&role.movie_id) {
            anyhow::bail!("movie {} does not exist", role.movie_id);
        }
        if let Some(actor_id) = role.actor_id {
            if !self.actors.contains_key(&actor_id) {
                anyhow::bail!("actor {actor_id} does not exist");
            }
        }
        let duplicated = self.roles.values().any(|r| {
            r.id != role.id && r.movie_id == role.movie_id && r.character == role.character
        });
        if duplicated {
            anyhow::bail!(
                "role '{}' already exists in movie {}",
                role.character,
                role.movie_id
            );
        }
        Ok(())
    }
}

fn check_len(field: &str, value: &str, max: usize) -> anyhow::Result<()> {
    if value.chars().count() > max {
        anyhow::bail!("{field} exceeds {max} characters");
    }
    Ok(())
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> anyhow::Result<(Vec<T>, u64)> {
    let total = u64::try_from(items.len())?;
    let offset = usize::try_from(page.offset())?;
    let limit = usize::try_from(page.limit())?;
    let items = if offset >= items.len() {
        Vec::new()
    } else {
        items.drain(offset..).take(limit).collect()
    };
    Ok((items, total))
}

#[async_trait]
impl MovieRepository for InMemoryCastingStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Movie>> {
        let state = self.state.read().await;
        Ok(state.movies.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> anyhow::Result<(Vec<Movie>, u64)> {
        let state = self.state.read().await;
        let mut movies: Vec<Movie> = state.movies.values().cloned().collect();
        movies.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        paginate(movies, page)
    }

    async fn create(&self, movie: &Movie) -> anyhow::Result<()> {
        check_len("title", &movie.title, MAX_TITLE_LEN)?;
        let mut state = self.state.write().await;
        if state.movies.contains_key(&movie.id) {
            anyhow::bail!("movie {} already exists", movie.id);
        }
        state.movies.insert(movie.id, movie.clone());
        Ok(())
    }

    async fn update(&self, movie: &Movie) -> anyhow::Result<()> {
        check_len("title", &movie.title, MAX_TITLE_LEN)?;
        let mut state = self.state.write().await;
        match state.movies.get_mut(&movie.id) {
            Some(stored) => {
                *stored = movie.clone();
                Ok(())
            }
            None => anyhow::bail!("movie {} does not exist", movie.id),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        state.movies.remove(&id);
        state.roles.retain(|_, role| role.movie_id != id);
        Ok(())
    }
}

#[async_trait]
impl ActorRepository for InMemoryCastingStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Actor>> {
        let state = self.state.read().await;
        Ok(state.actors.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> anyhow::Result<(Vec<Actor>, u64)> {
        let state = self.state.read().await;
        let mut actors: Vec<Actor> = state.actors.values().cloned().collect();
        actors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        paginate(actors, page)
    }

    async fn create(&self, actor: &Actor) -> anyhow::Result<()> {
        check_len("name", &actor.name, MAX_NAME_LEN)?;
        let mut state = self.state.write().await;
        if state.actors.contains_key(&actor.id) {
            anyhow::bail!("actor {} already exists", actor.id);
        }
        state.actors.insert(actor.id, actor.clone());
        Ok(())
    }

    async fn update(&self, actor: &Actor) -> anyhow::Result<()> {
        check_len("name", &actor.name, MAX_NAME_LEN)?;
        let mut state = self.state.write().await;
        match state.actors.get_mut(&actor.id) {
            Some(stored) => {
                *stored = actor.clone();
                Ok(())
            }
            None => anyhow::bail!("actor {} does not exist", actor.id),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        if state.roles.values().any(|role| role.actor_id == Some(id)) {
            anyhow::bail!("actor {id} is still assigned to roles");
        }
        state.actors.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryCastingStore {
    async fn find_in_movie(&self, movie_id: Uuid, role_id: Uuid) -> anyhow::Result<Option<Role>> {
        let state = self.state.read().await;
        Ok(state
            .roles
            .get(&role_id)
            .filter(|role| role.movie_id == movie_id)
            .cloned())
    }

    async fn list_by_movie(
        &self,
        movie_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Role>, u64)> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state
            .roles
            .values()
            .filter(|role| role.movie_id == movie_id)
            .cloned()
            .collect();
        roles.sort_by(|a, b| a.character.cmp(&b.character).then(a.id.cmp(&b.id)));
        paginate(roles, page)
    }

    async fn list_by_actor(
        &self,
        actor_id: Uuid,
        page: PageRequest,
    ) -> anyhow::Result<(Vec<Role>, u64)> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state
            .roles
            .values()
            .filter(|role| role.actor_id == Some(actor_id))
            .cloned()
            .collect();
        roles.sort_by(|a, b| a.character.cmp(&b.character).then(a.id.cmp(&b.id)));
        paginate(roles, page)
    }

    async fn create(&self, role: &Role) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        if state.roles.contains_key(&role.id) {
            anyhow::bail!("role {} already exists", role.id);
        }
        state.check_role(role)?;
        state.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn update(&self, role: &Role) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role.id) {
            anyhow::bail!("role {} does not exist", role.id);
        }
        state.check_role(role)?;
        state.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        state.roles.remove(&id);
        Ok(())
    }
}
