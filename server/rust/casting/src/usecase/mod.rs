pub mod error;
pub mod input;
pub mod manage_actors;
pub mod manage_movies;
pub mod manage_roles;

pub use error::UseCaseError;
pub use manage_actors::ManageActorsUseCase;
pub use manage_movies::ManageMoviesUseCase;
pub use manage_roles::ManageRolesUseCase;
