use actix_web::web;

pub mod admin;
pub mod auth;
pub mod content;
pub mod team_members;
pub mod teams;
pub mod uploads;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(teams::configure)
            .configure(team_members::configure)
            .configure(admin::configure)
            .configure(content::configure)
            .configure(uploads::configure),
    )
    .configure(uploads::configure_storage);
}
