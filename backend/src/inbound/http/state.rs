//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain services and ports, and remain testable with in-memory fixtures.

use std::sync::Arc;

use crate::domain::AccountService;
use crate::domain::ports::HeritagePointRepository;
use crate::map::MapStore;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub points: Arc<dyn HeritagePointRepository>,
    pub maps: MapStore,
}

impl HttpState {
    /// Construct state from its collaborators.
    pub fn new(
        accounts: AccountService,
        points: Arc<dyn HeritagePointRepository>,
        maps: MapStore,
    ) -> Self {
        Self {
            accounts,
            points,
            maps,
        }
    }
}
