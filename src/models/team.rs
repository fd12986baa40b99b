// src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum TeamStatus {
    Registered,
    PaymentPending,
    Confirmed,
    Withdrawn,
}

impl TeamStatus {
    /// Only confirmed teams may be booked into a match
    pub fn can_be_scheduled(&self) -> bool {
        matches!(self, TeamStatus::Confirmed)
    }
}

/// A pair of players registered in one category of one tournament
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub category_id: Uuid,
    pub player1_id: Uuid,
    pub player2_id: Option<Uuid>,
    pub status: TeamStatus,
    pub created_at: DateTime<Utc>,
}
