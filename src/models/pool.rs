// src/models/pool.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Running totals for one team inside one pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRecord {
    pub matches_played: u32,
    pub matches_won: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub points_won: u32,
    pub points_lost: u32,
}

impl StandingRecord {
    pub fn set_difference(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    pub fn point_difference(&self) -> i64 {
        i64::from(self.points_won) - i64::from(self.points_lost)
    }
}

/// Team id -> standings. Ordered so persisted JSON is stable.
pub type PoolStandings = BTreeMap<Uuid, StandingRecord>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub standings: PoolStandings,
    /// Matches already folded into `standings`, written together with them
    #[serde(default)]
    pub applied_matches: BTreeSet<Uuid>,
    /// Incremented on every standings write
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStanding {
    pub position: u32,
    pub team_id: Uuid,
    pub standing: StandingRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStandingsResponse {
    pub pool_id: Uuid,
    pub pool_name: String,
    pub version: i64,
    pub standings: Vec<RankedStanding>,
    pub last_updated: DateTime<Utc>,
}
