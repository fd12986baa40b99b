// src/routes/pools.rs
use actix_web::{get, web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::pool_handler;
use crate::services::StandingsService;

/// Get pool standings
#[get("/pools/{pool_id}/standings")]
async fn get_pool_standings(
    path: web::Path<Uuid>,
    standings_service: web::Data<StandingsService>,
) -> Result<HttpResponse> {
    let pool_id = path.into_inner();
    pool_handler::get_pool_standings(pool_id, standings_service).await
}
