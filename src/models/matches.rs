// src/models/matches.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::tournament::interval::TimeInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        }
    }

    /// No score or schedule mutation is allowed once a match is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }

    /// `scheduled -> in_progress -> completed`, `scheduled -> completed`,
    /// and `-> cancelled` from any non-terminal state. Staying in the same
    /// non-terminal state is allowed so partial scores can be recorded.
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        match (self, next) {
            (from, _) if from.is_terminal() => false,
            (MatchStatus::Scheduled, _) => true,
            (MatchStatus::InProgress, MatchStatus::Scheduled) => false,
            (MatchStatus::InProgress, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-set games for both sides, index `i` is set `i + 1`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetScores {
    pub team1: Vec<u32>,
    pub team2: Vec<u32>,
}

impl SetScores {
    pub fn new(team1: Vec<u32>, team2: Vec<u32>) -> Self {
        Self { team1, team2 }
    }

    pub fn set_count(&self) -> usize {
        self.team1.len().max(self.team2.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub category_id: Uuid,
    pub pool_id: Option<Uuid>,
    pub bracket_round: Option<String>,
    pub team1_id: Uuid,
    pub team2_id: Uuid,
    pub court_id: Option<Uuid>,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: MatchStatus,
    pub scores: Option<SetScores>,
    pub winner_id: Option<Uuid>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::from_start(self.scheduled_time, self.duration_minutes)
    }

    pub fn involves_team(&self, team_id: Uuid) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }

    pub fn team_id(&self, side: Side) -> Uuid {
        match side {
            Side::Team1 => self.team1_id,
            Side::Team2 => self.team2_id,
        }
    }
}

/// Request body for scheduling a match inside a tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    pub team1_id: Uuid,
    pub team2_id: Uuid,
    pub court_id: Option<Uuid>,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub pool_id: Option<Uuid>,
    pub bracket_round: Option<String>,
    pub status: Option<MatchStatus>,
    pub scores: Option<SetScores>,
}

/// Request body for submitting a score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScoreRequest {
    pub scores: SetScores,
    pub status: Option<MatchStatus>,
}

/// A booking that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub court_id: Option<Uuid>,
    pub team1_id: Uuid,
    pub team2_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: i32,
}

impl CandidateMatch {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::from_start(self.scheduled_time, self.duration_minutes)
    }

    pub fn team_ids(&self) -> [Uuid; 2] {
        [self.team1_id, self.team2_id]
    }
}

impl From<&CreateMatchRequest> for CandidateMatch {
    fn from(request: &CreateMatchRequest) -> Self {
        Self {
            court_id: request.court_id,
            team1_id: request.team1_id,
            team2_id: request.team2_id,
            scheduled_time: request.scheduled_time,
            duration_minutes: request.duration_minutes,
        }
    }
}

impl From<&Match> for CandidateMatch {
    fn from(m: &Match) -> Self {
        Self {
            court_id: m.court_id,
            team1_id: m.team1_id,
            team2_id: m.team2_id,
            scheduled_time: m.scheduled_time,
            duration_minutes: m.duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResult {
    pub court_conflict: bool,
    pub team_conflict: bool,
}

impl ConflictResult {
    pub fn has_conflict(&self) -> bool {
        self.court_conflict || self.team_conflict
    }
}

impl fmt::Display for ConflictResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.court_conflict, self.team_conflict) {
            (true, true) => write!(
                f,
                "Court is already booked and one or both teams already have a match during this time"
            ),
            (true, false) => write!(f, "Court is already booked during this time"),
            (false, true) => write!(
                f,
                "One or both teams already have a match scheduled during this time"
            ),
            (false, false) => write!(f, "No scheduling conflict"),
        }
    }
}

/// Optional filters when listing a tournament's matches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchFilter {
    #[serde(skip)]
    pub tournament_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub pool_id: Option<Uuid>,
    pub status: Option<MatchStatus>,
    pub court_id: Option<Uuid>,
    /// UTC calendar day of `scheduled_time`
    pub date: Option<NaiveDate>,
}

impl MatchFilter {
    pub fn matches(&self, m: &Match) -> bool {
        self.tournament_id.map_or(true, |id| m.tournament_id == id)
            && self.category_id.map_or(true, |id| m.category_id == id)
            && self.pool_id.map_or(true, |id| m.pool_id == Some(id))
            && self.status.map_or(true, |status| m.status == status)
            && self.court_id.map_or(true, |id| m.court_id == Some(id))
            && self.date.map_or(true, |day| m.scheduled_time.date_naive() == day)
    }
}
