use actix_web::web;

use crate::handlers::teams;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teams")
            .route("", web::get().to(teams::list_teams))
            .route("", web::post().to(teams::create_team))
            // Registered before /{id} so "mine" is not parsed as an id
            .route("/mine", web::get().to(teams::my_teams))
            .route("/{id}", web::get().to(teams::get_team))
            .route("/{id}", web::put().to(teams::update_team))
            .route("/{id}/join", web::post().to(teams::request_join))
            .route("/{id}/requests", web::get().to(teams::get_join_requests))
            .route("/{id}/leave", web::post().to(teams::leave_team))
            .route("/{id}/transfer", web::post().to(teams::transfer_captaincy)),
    );
}
