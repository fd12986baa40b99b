use actix_web::web;

pub mod backend_health;
pub mod matches;
pub mod pools;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Tournament scheduling and scoring routes
    cfg.service(matches::create_match)
        .service(matches::list_matches)
        .service(matches::check_conflicts)
        .service(matches::update_match_score)
        .service(pools::get_pool_standings);
}
