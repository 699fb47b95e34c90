pub mod actor;
pub mod movie;
pub mod role;

pub use actor::{Actor, ActorChanges};
pub use movie::{Movie, MovieChanges};
pub use role::{ActorAssignment, Role, RoleChanges};
