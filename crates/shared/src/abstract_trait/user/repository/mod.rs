pub mod command;
pub mod query;

pub use self::command::{DynUserCommandRepository, UserCommandRepositoryTrait};
pub use self::query::{DynUserQueryRepository, UserQueryRepositoryTrait};
