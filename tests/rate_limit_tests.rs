use std::net::SocketAddr;

use actix_web::{App, HttpResponse, http::StatusCode, test, web};
use pretty_assertions::assert_eq;
use serde_json::Value;
use serial_test::serial;
use squadhub::middleware::{AuthRateLimiter, RateLimitConfig, RateLimitMiddleware, RateLimitStore};

// Simple endpoint that always returns 200 OK
async fn ok_endpoint() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

fn peer(addr: &str) -> SocketAddr {
    addr.parse().unwrap()
}

#[actix_web::test]
async fn test_rate_limiting_blocks_after_limit() {
    let app = test::init_service(
        App::new()
            .wrap(RateLimitMiddleware::new(RateLimitConfig::new(2, 60)))
            .route("/test", web::get().to(ok_endpoint)),
    )
    .await;

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/test")
            .peer_addr(peer("203.0.113.5:5000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/test")
        .peer_addr(peer("203.0.113.5:5001"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Rate limit exceeded. Please try again later."
    );
}

#[actix_web::test]
async fn test_rate_limiting_is_per_ip() {
    let store = RateLimitStore::new();
    let app = test::init_service(
        App::new()
            .wrap(RateLimitMiddleware::with_store(
                RateLimitConfig::new(1, 60),
                store.clone(),
            ))
            .route("/test", web::get().to(ok_endpoint)),
    )
    .await;

    for addr in ["198.51.100.1:1000", "198.51.100.2:1000", "[2001:db8::1]:1000"] {
        let req = test::TestRequest::get()
            .uri("/test")
            .peer_addr(peer(addr))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", addr);
    }

    assert_eq!(store.len(), 3);
}

#[actix_web::test]
#[serial]
async fn test_login_limiter_allows_five_attempts() {
    let app = test::init_service(
        App::new().service(
            web::resource("/login")
                .wrap(AuthRateLimiter::login())
                .route(web::post().to(ok_endpoint)),
        ),
    )
    .await;

    // Dedicated address so the shared login store starts empty for it
    let addr = peer("192.0.2.77:4000");
    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri("/login")
            .peer_addr(addr)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/login")
        .peer_addr(addr)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Too many login attempts. Please try again in 5 minutes."
    );
}

#[actix_web::test]
#[serial]
async fn test_registration_limiter_allows_three_attempts() {
    let app = test::init_service(
        App::new().service(
            web::resource("/register")
                .wrap(AuthRateLimiter::registration())
                .route(web::post().to(ok_endpoint)),
        ),
    )
    .await;

    let addr = peer("192.0.2.88:4000");
    let mut statuses = Vec::new();
    for _ in 0..4 {
        let req = test::TestRequest::post()
            .uri("/register")
            .peer_addr(addr)
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );
}
