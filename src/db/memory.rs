use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::db::{ConflictQuery, StoreError, TournamentStore};
use crate::models::matches::{Match, MatchFilter, MatchStatus};
use crate::models::pool::Pool;
use crate::models::team::Team;
use crate::models::tournament::{Category, Tournament};

#[derive(Debug, Default)]
struct State {
    tournaments: HashMap<Uuid, Tournament>,
    categories: HashMap<Uuid, Category>,
    teams: HashMap<Uuid, Team>,
    matches: HashMap<Uuid, Match>,
    pools: HashMap<Uuid, Pool>,
}

/// Process-local store used by the integration tests and for running the
/// service without Postgres. Every call is atomic with respect to the others.
#[derive(Debug, Default)]
pub struct InMemoryTournamentStore {
    state: RwLock<State>,
}

impl InMemoryTournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_tournament(&self, tournament: Tournament) {
        self.write().tournaments.insert(tournament.id, tournament);
    }

    pub fn add_category(&self, category: Category) {
        self.write().categories.insert(category.id, category);
    }

    pub fn add_team(&self, team: Team) {
        self.write().teams.insert(team.id, team);
    }

    pub fn add_pool(&self, pool: Pool) {
        self.write().pools.insert(pool.id, pool);
    }
}

#[async_trait]
impl TournamentStore for InMemoryTournamentStore {
    async fn get_tournament(&self, id: Uuid) -> Result<Option<Tournament>, StoreError> {
        Ok(self.read().tournaments.get(&id).cloned())
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(self.read().categories.get(&id).cloned())
    }

    async fn get_teams(&self, tournament_id: Uuid, team_ids: &[Uuid]) -> Result<Vec<Team>, StoreError> {
        let state = self.read();
        Ok(team_ids
            .iter()
            .filter_map(|id| state.teams.get(id))
            .filter(|team| team.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    async fn get_match(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        Ok(self.read().matches.get(&id).cloned())
    }

    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, StoreError> {
        let mut matches: Vec<Match> = self
            .read()
            .matches
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.scheduled_time, m.id));
        Ok(matches)
    }

    async fn find_potential_conflicts(&self, query: &ConflictQuery) -> Result<Vec<Match>, StoreError> {
        // No time filter, the overlap test happens in the conflict check
        Ok(self
            .read()
            .matches
            .values()
            .filter(|m| m.status != MatchStatus::Completed)
            .filter(|m| {
                (query.court_id.is_some() && m.court_id == query.court_id)
                    || query.team_ids.iter().any(|team| m.involves_team(*team))
            })
            .cloned()
            .collect())
    }

    async fn insert_match(&self, m: &Match) -> Result<Match, StoreError> {
        self.write().matches.insert(m.id, m.clone());
        Ok(m.clone())
    }

    async fn update_match(&self, m: &Match, expected_version: i64) -> Result<Match, StoreError> {
        let mut state = self.write();
        let stored = state.matches.get_mut(&m.id).ok_or(StoreError::NotFound {
            entity: "Match",
            id: m.id,
        })?;

        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                entity: "Match",
                id: m.id,
                expected: expected_version,
            });
        }

        stored.status = m.status;
        stored.scores = m.scores.clone();
        stored.winner_id = m.winner_id;
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn get_pool(&self, id: Uuid) -> Result<Option<Pool>, StoreError> {
        Ok(self.read().pools.get(&id).cloned())
    }

    async fn save_pool_standings(&self, pool: &Pool, expected_version: i64) -> Result<Pool, StoreError> {
        let mut state = self.write();
        let stored = state.pools.get_mut(&pool.id).ok_or(StoreError::NotFound {
            entity: "Pool",
            id: pool.id,
        })?;

        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                entity: "Pool",
                id: pool.id,
                expected: expected_version,
            });
        }

        stored.standings = pool.standings.clone();
        stored.applied_matches = pool.applied_matches.clone();
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}
