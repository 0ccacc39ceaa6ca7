use actix_web::web;

use crate::handlers::content;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/content")
            .route("/events", web::get().to(content::published_events))
            .route("/streams", web::get().to(content::public_streams))
            .route("/testimonials", web::get().to(content::published_testimonials))
            .route("/info-cards", web::get().to(content::active_info_cards))
            .route("/sponsors", web::get().to(content::active_sponsors)),
    );
}
