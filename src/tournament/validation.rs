use uuid::Uuid;

use crate::models::matches::{CandidateMatch, CreateMatchRequest, Match, MatchStatus, SetScores};
use crate::models::pool::Pool;
use crate::models::team::Team;
use crate::models::tournament::{Tournament, TournamentStatus};

/// Upper bound on sets in one padel match (best of five, tie-break included)
pub const MAX_SETS: usize = 5;

/// Upper bound on games one side can take in a single set
pub const MAX_GAMES_PER_SET: u32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Team 1 and Team 2 cannot be the same")]
    SameTeams,

    #[error("Duration must be a positive number of minutes, got {0}")]
    NonPositiveDuration(i32),

    #[error("Both teams must have the same number of sets ({team1} vs {team2})")]
    MismatchedSetCount { team1: usize, team2: usize },

    #[error("Too many sets: {got} (max {max})")]
    TooManySets { got: usize, max: usize },

    #[error("Set {set} has {games} games (max {max})")]
    TooManyGames { set: usize, games: u32, max: u32 },

    #[error("One or both teams not found in this tournament")]
    TeamsNotInTournament,

    #[error("Both teams must be confirmed to schedule a match")]
    TeamsNotConfirmed,

    #[error("Teams must be in the same category")]
    CategoryMismatch,

    #[error("Pool {pool_id} does not belong to category {category_id}")]
    PoolCategoryMismatch { pool_id: Uuid, category_id: Uuid },

    #[error("New matches must be scheduled or in_progress, got {0}")]
    InvalidInitialStatus(MatchStatus),

    #[error("Cannot update scores for cancelled matches")]
    MatchCancelled,

    #[error("Cannot update scores for completed matches")]
    MatchCompleted,

    #[error("Tournament {0} is completed")]
    TournamentCompleted(Uuid),

    #[error("Invalid match status transition from {from} to {to}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },
}

/// Centralized validation for match scheduling and scoring
pub struct MatchValidator;

impl MatchValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a scheduling request before anything is fetched
    pub fn validate_create_match_request(
        &self,
        request: &CreateMatchRequest,
    ) -> Result<(), ValidationError> {
        self.validate_candidate(&CandidateMatch::from(request))?;

        if let Some(status) = request.status {
            if status.is_terminal() {
                return Err(ValidationError::InvalidInitialStatus(status));
            }
        }

        if let Some(scores) = &request.scores {
            self.validate_scores(scores)?;
        }

        Ok(())
    }

    /// Team identity and duration of a proposed booking
    pub fn validate_candidate(&self, candidate: &CandidateMatch) -> Result<(), ValidationError> {
        if candidate.team1_id == candidate.team2_id {
            return Err(ValidationError::SameTeams);
        }

        if candidate.duration_minutes <= 0 {
            return Err(ValidationError::NonPositiveDuration(candidate.duration_minutes));
        }

        Ok(())
    }

    pub fn validate_scores(&self, scores: &SetScores) -> Result<(), ValidationError> {
        if scores.team1.len() != scores.team2.len() {
            return Err(ValidationError::MismatchedSetCount {
                team1: scores.team1.len(),
                team2: scores.team2.len(),
            });
        }

        if scores.set_count() > MAX_SETS {
            return Err(ValidationError::TooManySets {
                got: scores.set_count(),
                max: MAX_SETS,
            });
        }

        let games = scores.team1.iter().zip(&scores.team2).enumerate();
        for (i, (&a, &b)) in games {
            if a.max(b) > MAX_GAMES_PER_SET {
                return Err(ValidationError::TooManyGames {
                    set: i + 1,
                    games: a.max(b),
                    max: MAX_GAMES_PER_SET,
                });
            }
        }

        Ok(())
    }

    /// Both teams registered in the tournament, confirmed, and in one category.
    /// Returns that category.
    pub fn validate_match_teams(
        &self,
        teams: &[Team],
        team1_id: Uuid,
        team2_id: Uuid,
    ) -> Result<Uuid, ValidationError> {
        let team1 = teams.iter().find(|t| t.id == team1_id);
        let team2 = teams.iter().find(|t| t.id == team2_id);

        let (team1, team2) = match (team1, team2) {
            (Some(team1), Some(team2)) => (team1, team2),
            _ => return Err(ValidationError::TeamsNotInTournament),
        };

        if !team1.status.can_be_scheduled() || !team2.status.can_be_scheduled() {
            return Err(ValidationError::TeamsNotConfirmed);
        }

        if team1.category_id != team2.category_id {
            return Err(ValidationError::CategoryMismatch);
        }

        Ok(team1.category_id)
    }

    pub fn validate_pool_category(&self, pool: &Pool, category_id: Uuid) -> Result<(), ValidationError> {
        if pool.category_id != category_id {
            return Err(ValidationError::PoolCategoryMismatch {
                pool_id: pool.id,
                category_id,
            });
        }
        Ok(())
    }

    /// Completed tournaments accept neither new bookings nor scores
    pub fn validate_tournament_open(&self, tournament: &Tournament) -> Result<(), ValidationError> {
        if tournament.status == TournamentStatus::Completed {
            return Err(ValidationError::TournamentCompleted(tournament.id));
        }
        Ok(())
    }

    /// Only non-terminal matches accept scores
    pub fn validate_scorable(&self, m: &Match) -> Result<(), ValidationError> {
        match m.status {
            MatchStatus::Cancelled => Err(ValidationError::MatchCancelled),
            MatchStatus::Completed => Err(ValidationError::MatchCompleted),
            _ => Ok(()),
        }
    }

    pub fn validate_transition(&self, from: MatchStatus, to: MatchStatus) -> Result<(), ValidationError> {
        if !from.can_transition_to(to) {
            return Err(ValidationError::InvalidTransition { from, to });
        }
        Ok(())
    }
}

impl Default for MatchValidator {
    fn default() -> Self {
        Self::new()
    }
}
