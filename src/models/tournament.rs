// src/models/tournament.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum TournamentStatus {
    Draft,
    Active,
    Completed,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum CategoryFormat {
    Pool,
    Knockout,
    League,
}

/// Criteria used to order teams that are level in a pool, applied in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiebreakerRule {
    MatchesWon,
    SetsWon,
    /// Games are stored as the per-set points of a padel score
    GamesWon,
    SetDifference,
    GameDifference,
    /// Matches won among the tied teams only
    DirectConfrontation,
}

impl TiebreakerRule {
    pub fn default_rules() -> Vec<TiebreakerRule> {
        vec![
            TiebreakerRule::MatchesWon,
            TiebreakerRule::SetsWon,
            TiebreakerRule::GamesWon,
            TiebreakerRule::DirectConfrontation,
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub format: CategoryFormat,
    pub tiebreaker_rules: Vec<TiebreakerRule>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiebreaker_rules_deserialize_from_snake_case() {
        let rules: Vec<TiebreakerRule> =
            serde_json::from_str(r#"["matches_won","sets_won","games_won","direct_confrontation"]"#)
                .unwrap();
        assert_eq!(rules, TiebreakerRule::default_rules());

        assert!(serde_json::from_str::<Vec<TiebreakerRule>>(r#"["coin_toss"]"#).is_err());
    }
}
