use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;
use uuid::Uuid;

use padel_tournament_backend::run;
use padel_tournament_backend::config::settings::{CorsSettings, StandingsSettings};
use padel_tournament_backend::db::InMemoryTournamentStore;
use padel_tournament_backend::models::pool::Pool;
use padel_tournament_backend::models::team::{Team, TeamStatus};
use padel_tournament_backend::models::tournament::{
    Category, CategoryFormat, TiebreakerRule, Tournament, TournamentStatus,
};
use padel_tournament_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub fn init_tracing() {
    Lazy::force(&TRACING);
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryTournamentStore>,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryTournamentStore::new());
    let server = run(
        listener,
        store.clone(),
        StandingsSettings { max_update_retries: 5 },
        CorsSettings::default(),
    )
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp { address, store }
}

/// One open tournament with a single pool category, four confirmed teams and a court
pub struct TournamentFixture {
    pub tournament_id: Uuid,
    pub category_id: Uuid,
    pub pool_id: Uuid,
    pub court_id: Uuid,
    pub teams: Vec<Uuid>,
}

pub fn seed_tournament(store: &InMemoryTournamentStore) -> TournamentFixture {
    seed_tournament_with_rules(store, TiebreakerRule::default_rules())
}

pub fn seed_tournament_with_rules(
    store: &InMemoryTournamentStore,
    tiebreaker_rules: Vec<TiebreakerRule>,
) -> TournamentFixture {
    let now = Utc::now();
    let tournament_id = Uuid::new_v4();
    store.add_tournament(Tournament {
        id: tournament_id,
        name: format!("Open {}", &tournament_id.to_string()[..8]),
        status: TournamentStatus::Active,
        created_at: now,
    });

    let category_id = Uuid::new_v4();
    store.add_category(Category {
        id: category_id,
        tournament_id,
        name: "Men A".to_string(),
        format: CategoryFormat::Pool,
        tiebreaker_rules,
        created_at: now,
    });

    let pool_id = Uuid::new_v4();
    store.add_pool(Pool {
        id: pool_id,
        category_id,
        name: "Pool A".to_string(),
        standings: Default::default(),
        applied_matches: Default::default(),
        version: 1,
        created_at: now,
        updated_at: now,
    });

    let teams = (0..4)
        .map(|_| add_team(store, tournament_id, category_id, TeamStatus::Confirmed))
        .collect();

    TournamentFixture {
        tournament_id,
        category_id,
        pool_id,
        court_id: Uuid::new_v4(),
        teams,
    }
}

pub fn add_team(
    store: &InMemoryTournamentStore,
    tournament_id: Uuid,
    category_id: Uuid,
    status: TeamStatus,
) -> Uuid {
    let team_id = Uuid::new_v4();
    store.add_team(Team {
        id: team_id,
        tournament_id,
        category_id,
        player1_id: Uuid::new_v4(),
        player2_id: Some(Uuid::new_v4()),
        status,
        created_at: Utc::now(),
    });
    team_id
}

/// Fixed reference time so overlap arithmetic in tests is easy to read
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 14, hour, minute, 0).unwrap()
}

pub async fn create_match(app: &TestApp, tournament_id: Uuid, body: &Value) -> reqwest::Response {
    Client::new()
        .post(&format!("{}/tournaments/{}/matches", app.address, tournament_id))
        .json(body)
        .send()
        .await
        .expect("Failed to execute request.")
}

pub async fn submit_score(app: &TestApp, match_id: &str, body: &Value) -> reqwest::Response {
    Client::new()
        .patch(&format!("{}/matches/{}/score", app.address, match_id))
        .json(body)
        .send()
        .await
        .expect("Failed to execute request.")
}

pub fn match_body(
    team1: Uuid,
    team2: Uuid,
    court: Option<Uuid>,
    start: DateTime<Utc>,
    duration_minutes: i32,
    pool: Option<Uuid>,
) -> Value {
    json!({
        "team1_id": team1,
        "team2_id": team2,
        "court_id": court,
        "scheduled_time": start,
        "duration_minutes": duration_minutes,
        "pool_id": pool
    })
}
