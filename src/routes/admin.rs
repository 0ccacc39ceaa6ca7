use actix_web::web;

use crate::handlers::{admin, content};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/teams", web::get().to(admin::get_teams_by_status))
            .route("/teams/{id}/approve", web::post().to(admin::approve_team))
            .route("/teams/{id}/reject", web::post().to(admin::reject_team))
            .route("/users", web::get().to(admin::get_users))
            .route("/users/{id}/role", web::put().to(admin::update_user_role))
            .route("/events", web::post().to(content::events::create))
            .route("/events", web::get().to(content::events::list))
            .route("/events/{id}", web::get().to(content::events::get))
            .route("/events/{id}", web::put().to(content::events::update))
            .route("/events/{id}", web::delete().to(content::events::delete))
            .route("/streams", web::post().to(content::streams::create))
            .route("/streams", web::get().to(content::streams::list))
            .route("/streams/{id}", web::get().to(content::streams::get))
            .route("/streams/{id}", web::put().to(content::streams::update))
            .route("/streams/{id}", web::delete().to(content::streams::delete))
            .route("/testimonials", web::post().to(content::testimonials::create))
            .route("/testimonials", web::get().to(content::testimonials::list))
            .route("/testimonials/{id}", web::get().to(content::testimonials::get))
            .route("/testimonials/{id}", web::put().to(content::testimonials::update))
            .route(
                "/testimonials/{id}",
                web::delete().to(content::testimonials::delete),
            )
            .route("/info-cards", web::post().to(content::info_cards::create))
            .route("/info-cards", web::get().to(content::info_cards::list))
            .route("/info-cards/{id}", web::get().to(content::info_cards::get))
            .route("/info-cards/{id}", web::put().to(content::info_cards::update))
            .route(
                "/info-cards/{id}",
                web::delete().to(content::info_cards::delete),
            )
            .route("/sponsors", web::post().to(content::sponsors::create))
            .route("/sponsors", web::get().to(content::sponsors::list))
            .route("/sponsors/{id}", web::get().to(content::sponsors::get))
            .route("/sponsors/{id}", web::put().to(content::sponsors::update))
            .route("/sponsors/{id}", web::delete().to(content::sponsors::delete)),
    );
}
