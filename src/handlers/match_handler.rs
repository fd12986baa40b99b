use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::error_response;
use crate::models::common::ApiResponse;
use crate::models::matches::{CandidateMatch, CreateMatchRequest, MatchFilter, UpdateScoreRequest};
use crate::services::MatchService;

#[tracing::instrument(
    name = "Create match",
    skip(request, match_service),
    fields(
        tournament_id = %tournament_id,
        court_id = ?request.court_id,
        scheduled_time = %request.scheduled_time
    )
)]
pub async fn create_match(
    tournament_id: Uuid,
    request: web::Json<CreateMatchRequest>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    tracing::info!(
        "Creating match {} vs {} in tournament {}",
        request.team1_id,
        request.team2_id,
        tournament_id
    );

    match match_service
        .schedule_match(tournament_id, request.into_inner())
        .await
    {
        Ok(created) => {
            tracing::info!("Successfully created match {}", created.id);
            Ok(HttpResponse::Created().json(ApiResponse::success("Match created successfully", created)))
        }
        Err(e) => {
            tracing::error!("Failed to create match in tournament {}: {}", tournament_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "List matches", skip(filter, match_service), fields(tournament_id = %tournament_id))]
pub async fn list_matches(
    tournament_id: Uuid,
    filter: web::Query<MatchFilter>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match match_service
        .list_matches(tournament_id, filter.into_inner())
        .await
    {
        Ok(matches) => {
            tracing::info!("Retrieved {} matches for tournament {}", matches.len(), tournament_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success("Matches retrieved successfully", matches)))
        }
        Err(e) => {
            tracing::error!("Failed to list matches for tournament {}: {}", tournament_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Check match conflicts", skip(candidate, match_service), fields(tournament_id = %tournament_id))]
pub async fn check_conflicts(
    tournament_id: Uuid,
    candidate: web::Json<CandidateMatch>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    match match_service
        .check_availability(tournament_id, candidate.into_inner())
        .await
    {
        Ok(result) => {
            let message = result.to_string();
            Ok(HttpResponse::Ok().json(ApiResponse::success(message, result)))
        }
        Err(e) => {
            tracing::error!("Failed to check conflicts in tournament {}: {}", tournament_id, e);
            Ok(error_response(&e))
        }
    }
}

#[tracing::instrument(name = "Update match score", skip(request, match_service), fields(match_id = %match_id))]
pub async fn update_match_score(
    match_id: Uuid,
    request: web::Json<UpdateScoreRequest>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    tracing::info!(
        "Updating score of match {}: {:?} - {:?}",
        match_id,
        request.scores.team1,
        request.scores.team2
    );

    match match_service.record_score(match_id, request.into_inner()).await {
        Ok(updated) => {
            tracing::info!("Successfully updated score of match {}", match_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success("Match score updated successfully", updated)))
        }
        Err(e) => {
            tracing::error!("Failed to update score of match {}: {}", match_id, e);
            Ok(error_response(&e))
        }
    }
}
