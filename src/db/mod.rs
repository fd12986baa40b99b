use async_trait::async_trait;
use uuid::Uuid;

use crate::models::matches::{CandidateMatch, Match, MatchFilter};
use crate::models::pool::Pool;
use crate::models::team::Team;
use crate::models::tournament::{Category, Tournament};
use crate::tournament::interval::TimeInterval;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTournamentStore;
pub use postgres::PgTournamentStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{entity} {id} was modified concurrently (expected version {expected})")]
    VersionConflict {
        entity: &'static str,
        id: Uuid,
        expected: i64,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store-side prefilter for the conflict check. Implementations may return
/// more matches than strictly overlap; the in-memory check decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictQuery {
    pub court_id: Option<Uuid>,
    pub team_ids: [Uuid; 2],
    pub window: TimeInterval,
}

impl From<&CandidateMatch> for ConflictQuery {
    fn from(candidate: &CandidateMatch) -> Self {
        Self {
            court_id: candidate.court_id,
            team_ids: candidate.team_ids(),
            window: candidate.interval(),
        }
    }
}

/// Data access needed by the match and standings services
#[async_trait]
pub trait TournamentStore: Send + Sync {
    async fn get_tournament(&self, id: Uuid) -> Result<Option<Tournament>, StoreError>;

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, StoreError>;

    /// Teams of `tournament_id` among `team_ids`
    async fn get_teams(&self, tournament_id: Uuid, team_ids: &[Uuid]) -> Result<Vec<Team>, StoreError>;

    async fn get_match(&self, id: Uuid) -> Result<Option<Match>, StoreError>;

    /// Ordered by `scheduled_time` ascending
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, StoreError>;

    /// Non-completed matches on the court or involving either team near the window
    async fn find_potential_conflicts(&self, query: &ConflictQuery) -> Result<Vec<Match>, StoreError>;

    async fn insert_match(&self, m: &Match) -> Result<Match, StoreError>;

    /// Writes status, scores and winner if the stored version still equals
    /// `expected_version`, bumping the version
    async fn update_match(&self, m: &Match, expected_version: i64) -> Result<Match, StoreError>;

    async fn get_pool(&self, id: Uuid) -> Result<Option<Pool>, StoreError>;

    /// Writes standings and applied matches if the stored version still
    /// equals `expected_version`, bumping the version
    async fn save_pool_standings(&self, pool: &Pool, expected_version: i64) -> Result<Pool, StoreError>;
}
