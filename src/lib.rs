use actix_web::{error, http, web, App, HttpResponse, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use std::net::TcpListener;
use std::sync::Arc;
use actix_cors::Cors;

pub mod config;
mod routes;
mod handlers;
pub mod models;
pub mod db;
pub mod services;
pub mod telemetry;
pub mod tournament;
use crate::routes::init_routes;
use crate::config::settings::{CorsSettings, StandingsSettings};
use crate::db::TournamentStore;
use crate::models::common::ApiResponse;
use crate::services::{MatchService, StandingsService};

pub fn run(
    listener: TcpListener,
    store: Arc<dyn TournamentStore>,
    standings_settings: StandingsSettings,
    cors_settings: CorsSettings,
) -> Result<Server, std::io::Error> {
    let standings_service = Arc::new(StandingsService::new(
        store.clone(),
        standings_settings.max_update_retries,
    ));
    let match_service = MatchService::new(store, standings_service.clone());

    // Wrap using web::Data, which boils down to an Arc smart pointer
    let standings_service = web::Data::from(standings_service);
    let match_service = web::Data::new(match_service);

    let server = HttpServer::new(move || {
        let cors = cors_settings
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH"])
            .allowed_headers(vec![
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        // Malformed bodies and queries get the same envelope as validation errors
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error(format!("Invalid request body: {}", err)));
            error::InternalError::from_response(err, response).into()
        });
        let query_config = web::QueryConfig::default().error_handler(|err, _req| {
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error(format!("Invalid query parameters: {}", err)));
            error::InternalError::from_response(err, response).into()
        });

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(json_config)
            .app_data(query_config)
            .app_data(match_service.clone())
            .app_data(standings_service.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
