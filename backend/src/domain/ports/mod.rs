//! Domain ports and supporting types for the hexagonal boundary.

mod heritage_repository;
mod user_repository;

pub use heritage_repository::{
    FixtureHeritagePointRepository, HeritageInsertError, HeritagePointRepository,
    HeritageQueryError,
};
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
