use uuid::Uuid;

use crate::db::StoreError;
use crate::models::matches::ConflictResult;
use crate::tournament::validation::ValidationError;

pub mod booking_locks;
pub mod match_service;
pub mod standings_service;

pub use booking_locks::BookingLocks;
pub use match_service::MatchService;
pub use standings_service::StandingsService;

#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    SchedulingConflict(ConflictResult),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{entity} {id} was updated concurrently, please retry")]
    ConcurrentUpdate { entity: &'static str, id: Uuid },

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for TournamentError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { entity, id } => TournamentError::NotFound { entity, id },
            StoreError::VersionConflict { entity, id, .. } => {
                TournamentError::ConcurrentUpdate { entity, id }
            }
            other => TournamentError::Store(other),
        }
    }
}
