pub mod actor_repository;
pub mod movie_repository;
pub mod role_repository;

pub use actor_repository::ActorRepository;
pub use movie_repository::MovieRepository;
pub use role_repository::RoleRepository;
