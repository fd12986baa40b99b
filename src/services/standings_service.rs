use std::sync::Arc;
use uuid::Uuid;

use crate::db::{StoreError, TournamentStore};
use crate::models::matches::{Match, MatchFilter, MatchStatus};
use crate::models::pool::{Pool, PoolStandingsResponse};
use crate::services::TournamentError;
use crate::tournament::ranking::rank_standings;
use crate::tournament::standings::apply_match_result;

/// Service responsible for pool standings
pub struct StandingsService {
    store: Arc<dyn TournamentStore>,
    max_update_retries: u32,
}

impl StandingsService {
    pub fn new(store: Arc<dyn TournamentStore>, max_update_retries: u32) -> Self {
        Self {
            store,
            max_update_retries,
        }
    }

    /// Fold a completed match into its pool, at most once per match.
    ///
    /// The match id is recorded in the same versioned write as the standings,
    /// so calling this again for a counted match leaves the pool as is. The
    /// pool is re-read and the result re-applied whenever another writer got
    /// in between, up to `max_update_retries` times. Returns `None` for
    /// matches outside any pool.
    #[tracing::instrument(name = "Apply match result to pool", skip(self, m), fields(match_id = %m.id))]
    pub async fn apply_completed_match(&self, m: &Match) -> Result<Option<Pool>, TournamentError> {
        let pool_id = match m.pool_id {
            Some(pool_id) => pool_id,
            None => return Ok(None),
        };

        let mut retries = 0;
        loop {
            let pool = self
                .store
                .get_pool(pool_id)
                .await?
                .ok_or(TournamentError::NotFound { entity: "Pool", id: pool_id })?;

            if pool.applied_matches.contains(&m.id) {
                tracing::info!("Match {} is already counted in pool {}", m.id, pool_id);
                return Ok(Some(pool));
            }

            let mut updated = Pool {
                standings: apply_match_result(&pool.standings, m),
                ..pool.clone()
            };
            updated.applied_matches.insert(m.id);

            match self.store.save_pool_standings(&updated, pool.version).await {
                Ok(saved) => {
                    tracing::info!(
                        "Updated standings of pool {} after match {} (version {} -> {})",
                        pool_id,
                        m.id,
                        pool.version,
                        saved.version
                    );
                    return Ok(Some(saved));
                }
                Err(StoreError::VersionConflict { .. }) if retries < self.max_update_retries => {
                    retries += 1;
                    tracing::warn!(
                        "Standings of pool {} changed while applying match {}, retry {}/{}",
                        pool_id,
                        m.id,
                        retries,
                        self.max_update_retries
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to save standings of pool {}: {}", pool_id, e);
                    return Err(e.into());
                }
            }
        }
    }

    /// Ranked standings of a pool, ordered by its category's tiebreaker rules
    pub async fn get_ranked_standings(&self, pool_id: Uuid) -> Result<PoolStandingsResponse, TournamentError> {
        let pool = self
            .store
            .get_pool(pool_id)
            .await?
            .ok_or(TournamentError::NotFound { entity: "Pool", id: pool_id })?;

        let category = self
            .store
            .get_category(pool.category_id)
            .await?
            .ok_or(TournamentError::NotFound { entity: "Category", id: pool.category_id })?;

        let head_to_head = self
            .store
            .list_matches(&MatchFilter {
                pool_id: Some(pool_id),
                status: Some(MatchStatus::Completed),
                ..Default::default()
            })
            .await?;

        let standings = rank_standings(&pool.standings, &category.tiebreaker_rules, &head_to_head);

        Ok(PoolStandingsResponse {
            pool_id: pool.id,
            pool_name: pool.name,
            version: pool.version,
            standings,
            last_updated: pool.updated_at,
        })
    }
}
