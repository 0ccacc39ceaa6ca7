use actix_web::web;

use crate::handlers::team_members;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/team-members")
            .route("/{id}/approve", web::post().to(team_members::approve_member))
            .route("/{id}/reject", web::post().to(team_members::reject_member))
            .route("/{id}", web::delete().to(team_members::kick_member)),
    );
}
