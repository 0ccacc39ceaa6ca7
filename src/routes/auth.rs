use actix_web::web;

use crate::handlers::auth;
use crate::middleware::AuthRateLimiter;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/register")
                    .wrap(AuthRateLimiter::registration())
                    .route(web::post().to(auth::register)),
            )
            .service(
                web::resource("/login")
                    .wrap(AuthRateLimiter::login())
                    .route(web::post().to(auth::login)),
            )
            .route("/me", web::get().to(auth::me))
            .route("/me", web::put().to(auth::update_me)),
    );
}
