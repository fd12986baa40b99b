use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{ConflictQuery, TournamentStore};
use crate::models::matches::{
    CandidateMatch, ConflictResult, CreateMatchRequest, Match, MatchFilter, MatchStatus, UpdateScoreRequest,
};
use crate::models::tournament::Tournament;
use crate::services::{BookingLocks, StandingsService, TournamentError};
use crate::tournament::conflicts::check_conflict;
use crate::tournament::scoring::match_winner;
use crate::tournament::validation::MatchValidator;

/// Service for scheduling matches and recording their scores
pub struct MatchService {
    store: Arc<dyn TournamentStore>,
    standings: Arc<StandingsService>,
    validator: MatchValidator,
    locks: BookingLocks,
}

impl MatchService {
    pub fn new(store: Arc<dyn TournamentStore>, standings: Arc<StandingsService>) -> Self {
        Self {
            store,
            standings,
            validator: MatchValidator::new(),
            locks: BookingLocks::new(),
        }
    }

    async fn open_tournament(&self, tournament_id: Uuid) -> Result<Tournament, TournamentError> {
        let tournament = self
            .store
            .get_tournament(tournament_id)
            .await?
            .ok_or(TournamentError::NotFound { entity: "Tournament", id: tournament_id })?;
        self.validator.validate_tournament_open(&tournament)?;
        Ok(tournament)
    }

    /// Book a match after checking teams, pool and court/team availability.
    ///
    /// Court and both teams stay locked from the conflict lookup until the
    /// insert, so two bookings on a shared resource cannot both pass the check.
    #[tracing::instrument(
        name = "Schedule match",
        skip(self, request),
        fields(
            tournament_id = %tournament_id,
            team1_id = %request.team1_id,
            team2_id = %request.team2_id,
            court_id = ?request.court_id
        )
    )]
    pub async fn schedule_match(
        &self,
        tournament_id: Uuid,
        request: CreateMatchRequest,
    ) -> Result<Match, TournamentError> {
        self.validator.validate_create_match_request(&request)?;

        let candidate = CandidateMatch::from(&request);
        let _booking = self.locks.acquire_for(&candidate).await;

        self.open_tournament(tournament_id).await?;

        let teams = self
            .store
            .get_teams(tournament_id, &candidate.team_ids())
            .await?;
        let category_id = self
            .validator
            .validate_match_teams(&teams, request.team1_id, request.team2_id)?;

        if let Some(pool_id) = request.pool_id {
            let pool = self
                .store
                .get_pool(pool_id)
                .await?
                .ok_or(TournamentError::NotFound { entity: "Pool", id: pool_id })?;
            self.validator.validate_pool_category(&pool, category_id)?;
        }

        let existing = self
            .store
            .find_potential_conflicts(&ConflictQuery::from(&candidate))
            .await?;
        let conflict = check_conflict(&candidate, &existing);
        if conflict.has_conflict() {
            tracing::warn!(
                "Rejected booking at {} for {} minutes: {}",
                candidate.scheduled_time,
                candidate.duration_minutes,
                conflict
            );
            return Err(TournamentError::SchedulingConflict(conflict));
        }

        let now = Utc::now();
        let new_match = Match {
            id: Uuid::new_v4(),
            tournament_id,
            category_id,
            pool_id: request.pool_id,
            bracket_round: request.bracket_round,
            team1_id: request.team1_id,
            team2_id: request.team2_id,
            court_id: request.court_id,
            scheduled_time: request.scheduled_time,
            duration_minutes: request.duration_minutes,
            status: request.status.unwrap_or(MatchStatus::Scheduled),
            scores: request.scores,
            winner_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let saved = self.store.insert_match(&new_match).await?;
        tracing::info!("Scheduled match {} in tournament {}", saved.id, tournament_id);
        Ok(saved)
    }

    /// Record a score and derive the winner.
    ///
    /// Without an explicit status a decided score completes the match. The
    /// transition into `completed` folds the result into the pool. Submitting
    /// the stored score of a completed pool match again retries that fold,
    /// which counts each match at most once.
    #[tracing::instrument(name = "Record match score", skip(self, request), fields(match_id = %match_id))]
    pub async fn record_score(
        &self,
        match_id: Uuid,
        request: UpdateScoreRequest,
    ) -> Result<Match, TournamentError> {
        self.validator.validate_scores(&request.scores)?;

        let current = self
            .store
            .get_match(match_id)
            .await?
            .ok_or(TournamentError::NotFound { entity: "Match", id: match_id })?;

        if is_resubmission(&current, &request) {
            // The pool write of an earlier submission may not have landed
            self.open_tournament(current.tournament_id).await?;
            self.standings.apply_completed_match(&current).await?;
            tracing::info!("Re-applied completed match {} to its pool", match_id);
            return Ok(current);
        }

        self.validator.validate_scorable(&current)?;
        self.open_tournament(current.tournament_id).await?;

        let winner = match_winner(&request.scores);
        let new_status = match (request.status, winner) {
            (Some(status), _) => status,
            (None, Some(_)) => MatchStatus::Completed,
            (None, None) => current.status,
        };
        self.validator.validate_transition(current.status, new_status)?;

        let winner_id = match new_status {
            MatchStatus::Cancelled => None,
            _ => winner.map(|side| current.team_id(side)),
        };

        let updated = Match {
            status: new_status,
            winner_id,
            scores: Some(request.scores),
            ..current.clone()
        };

        let saved = self.store.update_match(&updated, current.version).await?;
        tracing::info!(
            "Recorded score for match {}: status {} -> {}, winner {:?}",
            match_id,
            current.status,
            saved.status,
            saved.winner_id
        );

        if saved.status == MatchStatus::Completed && current.status != MatchStatus::Completed {
            if let Err(e) = self.standings.apply_completed_match(&saved).await {
                tracing::error!(
                    "Match {} was completed but its pool standings were not updated: {}",
                    match_id,
                    e
                );
                return Err(e);
            }
        }

        Ok(saved)
    }

    pub async fn list_matches(
        &self,
        tournament_id: Uuid,
        mut filter: MatchFilter,
    ) -> Result<Vec<Match>, TournamentError> {
        self.store
            .get_tournament(tournament_id)
            .await?
            .ok_or(TournamentError::NotFound { entity: "Tournament", id: tournament_id })?;

        filter.tournament_id = Some(tournament_id);
        let matches = self.store.list_matches(&filter).await?;
        tracing::debug!("Found {} matches in tournament {}", matches.len(), tournament_id);
        Ok(matches)
    }

    /// Conflict check for a proposed booking without persisting anything
    pub async fn check_availability(
        &self,
        tournament_id: Uuid,
        candidate: CandidateMatch,
    ) -> Result<ConflictResult, TournamentError> {
        self.validator.validate_candidate(&candidate)?;
        self.store
            .get_tournament(tournament_id)
            .await?
            .ok_or(TournamentError::NotFound { entity: "Tournament", id: tournament_id })?;

        let existing = self
            .store
            .find_potential_conflicts(&ConflictQuery::from(&candidate))
            .await?;
        Ok(check_conflict(&candidate, &existing))
    }
}

/// Same score sent again for a completed pool match
fn is_resubmission(current: &Match, request: &UpdateScoreRequest) -> bool {
    current.status == MatchStatus::Completed
        && current.pool_id.is_some()
        && current.scores.as_ref() == Some(&request.scores)
        && matches!(request.status, None | Some(MatchStatus::Completed))
}
