use actix_web::HttpResponse;

use crate::models::common::ApiResponse;
use crate::models::matches::ConflictResult;
use crate::services::TournamentError;

pub mod backend_health_handler;
pub mod match_handler;
pub mod pool_handler;

/// Map a service error onto its HTTP status and `ApiResponse` body
pub fn error_response(error: &TournamentError) -> HttpResponse {
    match error {
        TournamentError::Validation(e) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error(e.to_string()))
        }
        TournamentError::SchedulingConflict(conflict) => HttpResponse::Conflict().json(
            ApiResponse::<ConflictResult>::error_with_data(conflict.to_string(), *conflict),
        ),
        TournamentError::NotFound { .. } => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error(error.to_string()))
        }
        TournamentError::ConcurrentUpdate { .. } => {
            HttpResponse::Conflict().json(ApiResponse::<()>::error(error.to_string()))
        }
        TournamentError::Store(_) => HttpResponse::InternalServerError()
            .json(ApiResponse::<()>::error("Internal server error")),
    }
}
