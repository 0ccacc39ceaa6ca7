use actix_web::web;

use crate::handlers::uploads;
use crate::services::storage::MAX_UPLOAD_BYTES;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/uploads")
            // Bucket ceilings are enforced per bucket; this only lifts the extractor default
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES + 1))
            .route("/{bucket}", web::post().to(uploads::upload)),
    );
}

pub fn configure_storage(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/storage/{bucket}/{file}",
        web::get().to(uploads::serve_object),
    );
}
