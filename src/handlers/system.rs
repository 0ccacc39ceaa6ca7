use actix_web::{HttpResponse, Responder, get};

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("SquadHub API v1.0")
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}
