use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::{ConflictQuery, StoreError, TournamentStore};
use crate::models::matches::{Match, MatchFilter, MatchStatus, SetScores};
use crate::models::pool::{Pool, PoolStandings};
use crate::models::team::Team;
use crate::models::tournament::{Category, CategoryFormat, TiebreakerRule, Tournament};

const MATCH_COLUMNS: &str = r#"
    id, tournament_id, category_id, pool_id, bracket_round, team1_id, team2_id,
    court_id, scheduled_time, duration_minutes, status, scores, winner_id,
    version, created_at, updated_at
"#;

#[derive(Debug, FromRow)]
struct MatchRow {
    id: Uuid,
    tournament_id: Uuid,
    category_id: Uuid,
    pool_id: Option<Uuid>,
    bracket_round: Option<String>,
    team1_id: Uuid,
    team2_id: Uuid,
    court_id: Option<Uuid>,
    scheduled_time: DateTime<Utc>,
    duration_minutes: i32,
    status: MatchStatus,
    scores: Option<Json<SetScores>>,
    winner_id: Option<Uuid>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MatchRow> for Match {
    fn from(row: MatchRow) -> Self {
        Match {
            id: row.id,
            tournament_id: row.tournament_id,
            category_id: row.category_id,
            pool_id: row.pool_id,
            bracket_round: row.bracket_round,
            team1_id: row.team1_id,
            team2_id: row.team2_id,
            court_id: row.court_id,
            scheduled_time: row.scheduled_time,
            duration_minutes: row.duration_minutes,
            status: row.status,
            scores: row.scores.map(|Json(scores)| scores),
            winner_id: row.winner_id,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PoolRow {
    id: Uuid,
    category_id: Uuid,
    name: String,
    standings: Json<PoolStandings>,
    applied_match_ids: Vec<Uuid>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PoolRow> for Pool {
    fn from(row: PoolRow) -> Self {
        Pool {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            standings: row.standings.0,
            applied_matches: row.applied_match_ids.into_iter().collect(),
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    tournament_id: Uuid,
    name: String,
    format: CategoryFormat,
    tiebreaker_rules: Json<Vec<TiebreakerRule>>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            tournament_id: row.tournament_id,
            name: row.name,
            format: row.format,
            tiebreaker_rules: row.tiebreaker_rules.0,
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed store. Matches and pools are updated with
/// `WHERE version = $expected` so concurrent writers cannot overwrite each other.
#[derive(Debug, Clone)]
pub struct PgTournamentStore {
    pool: PgPool,
}

impl PgTournamentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, table: &'static str, id: Uuid) -> Result<bool, StoreError> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table);
        let exists: bool = sqlx::query_scalar(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl TournamentStore for PgTournamentStore {
    async fn get_tournament(&self, id: Uuid) -> Result<Option<Tournament>, StoreError> {
        let tournament = sqlx::query_as::<_, Tournament>(
            "SELECT id, name, status, created_at FROM tournaments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tournament)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, tournament_id, name, format, tiebreaker_rules, created_at
            FROM tournament_categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Category::from))
    }

    async fn get_teams(&self, tournament_id: Uuid, team_ids: &[Uuid]) -> Result<Vec<Team>, StoreError> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, tournament_id, category_id, player1_id, player2_id, status, created_at
            FROM teams
            WHERE tournament_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(tournament_id)
        .bind(team_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    async fn get_match(&self, id: Uuid) -> Result<Option<Match>, StoreError> {
        let query = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);
        let row = sqlx::query_as::<_, MatchRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Match::from))
    }

    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM matches WHERE TRUE", MATCH_COLUMNS));

        if let Some(tournament_id) = filter.tournament_id {
            builder.push(" AND tournament_id = ").push_bind(tournament_id);
        }
        if let Some(category_id) = filter.category_id {
            builder.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(pool_id) = filter.pool_id {
            builder.push(" AND pool_id = ").push_bind(pool_id);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(court_id) = filter.court_id {
            builder.push(" AND court_id = ").push_bind(court_id);
        }
        if let Some(day) = filter.date {
            let day_start = day.and_time(chrono::NaiveTime::MIN).and_utc();
            builder
                .push(" AND scheduled_time >= ")
                .push_bind(day_start)
                .push(" AND scheduled_time < ")
                .push_bind(day_start + Duration::days(1));
        }
        builder.push(" ORDER BY scheduled_time ASC, id ASC");

        let rows = builder
            .build_query_as::<MatchRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Match::from).collect())
    }

    async fn find_potential_conflicts(&self, query: &ConflictQuery) -> Result<Vec<Match>, StoreError> {
        let sql = format!(
            r#"
            SELECT {} FROM matches
            WHERE status <> 'completed'
              AND (court_id = $1 OR team1_id = ANY($2) OR team2_id = ANY($2))
              AND scheduled_time < $3
              AND scheduled_time + make_interval(mins => duration_minutes) > $4
            "#,
            MATCH_COLUMNS
        );
        let rows = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(query.court_id)
            .bind(query.team_ids.to_vec())
            .bind(query.window.end)
            .bind(query.window.start)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            "Conflict prefilter returned {} candidate matches for window {} - {}",
            rows.len(),
            query.window.start,
            query.window.end
        );

        Ok(rows.into_iter().map(Match::from).collect())
    }

    async fn insert_match(&self, m: &Match) -> Result<Match, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO matches (
                id, tournament_id, category_id, pool_id, bracket_round, team1_id, team2_id,
                court_id, scheduled_time, duration_minutes, status, scores, winner_id,
                version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );
        let row = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(m.id)
            .bind(m.tournament_id)
            .bind(m.category_id)
            .bind(m.pool_id)
            .bind(m.bracket_round.as_deref())
            .bind(m.team1_id)
            .bind(m.team2_id)
            .bind(m.court_id)
            .bind(m.scheduled_time)
            .bind(m.duration_minutes)
            .bind(m.status)
            .bind(m.scores.clone().map(Json))
            .bind(m.winner_id)
            .bind(m.version)
            .bind(m.created_at)
            .bind(m.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update_match(&self, m: &Match, expected_version: i64) -> Result<Match, StoreError> {
        let sql = format!(
            r#"
            UPDATE matches
            SET status = $1, scores = $2, winner_id = $3,
                version = version + 1, updated_at = NOW()
            WHERE id = $4 AND version = $5
            RETURNING {}
            "#,
            MATCH_COLUMNS
        );
        let row = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(m.status)
            .bind(m.scores.clone().map(Json))
            .bind(m.winner_id)
            .bind(m.id)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        if self.exists("matches", m.id).await? {
            Err(StoreError::VersionConflict {
                entity: "Match",
                id: m.id,
                expected: expected_version,
            })
        } else {
            Err(StoreError::NotFound { entity: "Match", id: m.id })
        }
    }

    async fn get_pool(&self, id: Uuid) -> Result<Option<Pool>, StoreError> {
        let row = sqlx::query_as::<_, PoolRow>(
            r#"
            SELECT id, category_id, name, standings, applied_match_ids, version, created_at, updated_at
            FROM pools
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Pool::from))
    }

    async fn save_pool_standings(&self, pool: &Pool, expected_version: i64) -> Result<Pool, StoreError> {
        let pool_id = pool.id;
        let row = sqlx::query_as::<_, PoolRow>(
            r#"
            UPDATE pools
            SET standings = $1, applied_match_ids = $2, version = version + 1, updated_at = NOW()
            WHERE id = $3 AND version = $4
            RETURNING id, category_id, name, standings, applied_match_ids, version, created_at, updated_at
            "#,
        )
        .bind(Json(&pool.standings))
        .bind(pool.applied_matches.iter().copied().collect::<Vec<Uuid>>())
        .bind(pool_id)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        if self.exists("pools", pool_id).await? {
            Err(StoreError::VersionConflict {
                entity: "Pool",
                id: pool_id,
                expected: expected_version,
            })
        } else {
            Err(StoreError::NotFound { entity: "Pool", id: pool_id })
        }
    }
}
