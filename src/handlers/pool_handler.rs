use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::error_response;
use crate::models::common::ApiResponse;
use crate::services::StandingsService;

/// Get pool standings ranked by the category's tiebreakers
#[tracing::instrument(name = "Get pool standings", skip(standings_service), fields(pool_id = %pool_id))]
pub async fn get_pool_standings(
    pool_id: Uuid,
    standings_service: web::Data<StandingsService>,
) -> Result<HttpResponse> {
    match standings_service.get_ranked_standings(pool_id).await {
        Ok(standings) => {
            tracing::info!(
                "Retrieved {} standings for pool {} (version {})",
                standings.standings.len(),
                pool_id,
                standings.version
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success("Standings retrieved successfully", standings)))
        }
        Err(e) => {
            tracing::error!("Failed to get standings for pool {}: {}", pool_id, e);
            Ok(error_response(&e))
        }
    }
}
