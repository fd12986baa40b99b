// src/routes/matches.rs
use actix_web::{get, patch, post, web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::match_handler;
use crate::models::matches::{CandidateMatch, CreateMatchRequest, MatchFilter, UpdateScoreRequest};
use crate::services::MatchService;

/// Schedule a match in a tournament
#[post("/tournaments/{tournament_id}/matches")]
async fn create_match(
    path: web::Path<Uuid>,
    request: web::Json<CreateMatchRequest>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    match_handler::create_match(tournament_id, request, match_service).await
}

/// List a tournament's matches
#[get("/tournaments/{tournament_id}/matches")]
async fn list_matches(
    path: web::Path<Uuid>,
    filter: web::Query<MatchFilter>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    match_handler::list_matches(tournament_id, filter, match_service).await
}

/// Check a proposed booking against existing matches
#[post("/tournaments/{tournament_id}/matches/conflicts")]
async fn check_conflicts(
    path: web::Path<Uuid>,
    candidate: web::Json<CandidateMatch>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let tournament_id = path.into_inner();
    match_handler::check_conflicts(tournament_id, candidate, match_service).await
}

/// Submit a match score
#[patch("/matches/{match_id}/score")]
async fn update_match_score(
    path: web::Path<Uuid>,
    request: web::Json<UpdateScoreRequest>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    match_handler::update_match_score(match_id, request, match_service).await
}
