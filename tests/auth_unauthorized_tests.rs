use actix_web::{App, http::StatusCode, test, web};
use pretty_assertions::assert_eq;
use serial_test::serial;
use squadhub::routes;

mod common;

const TEAM_ID: &str = "5f0c8a52-3f7e-4c55-9d7a-4c1e2b7d9a10";
const MEMBER_ID: &str = "0b6f2a2e-77c1-4a8e-9f44-2d5b3c1e8f21";

// Macro to generate unauthorized access tests against the full route table
macro_rules! test_unauthorized {
    ($test_name:ident, $method:ident, $uri:expr) => {
        #[actix_web::test]
        #[serial]
        async fn $test_name() {
            common::setup_test_env();

            let app = test::init_service(
                App::new()
                    .app_data(web::Data::new(common::test_config()))
                    .configure(routes::configure),
            )
            .await;

            let req = test::TestRequest::$method().uri(&$uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    };
    ($test_name:ident, $method:ident, $uri:expr, $json:expr) => {
        #[actix_web::test]
        #[serial]
        async fn $test_name() {
            common::setup_test_env();

            let app = test::init_service(
                App::new()
                    .app_data(web::Data::new(common::test_config()))
                    .configure(routes::configure),
            )
            .await;

            let req = test::TestRequest::$method()
                .uri(&$uri)
                .set_json($json)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    };
}

// Profile
test_unauthorized!(test_me_unauthorized, get, "/api/v1/auth/me".to_string());
test_unauthorized!(
    test_update_me_unauthorized,
    put,
    "/api/v1/auth/me".to_string(),
    serde_json::json!({ "username": "new_name" })
);

// Teams
test_unauthorized!(
    test_create_team_unauthorized,
    post,
    "/api/v1/teams".to_string(),
    serde_json::json!({ "teamName": "Night Owls" })
);
test_unauthorized!(test_my_teams_unauthorized, get, "/api/v1/teams/mine".to_string());
test_unauthorized!(
    test_update_team_unauthorized,
    put,
    format!("/api/v1/teams/{}", TEAM_ID),
    serde_json::json!({ "teamName": "Night Owls" })
);
test_unauthorized!(
    test_join_team_unauthorized,
    post,
    format!("/api/v1/teams/{}/join", TEAM_ID)
);
test_unauthorized!(
    test_join_requests_unauthorized,
    get,
    format!("/api/v1/teams/{}/requests", TEAM_ID)
);
test_unauthorized!(
    test_leave_team_unauthorized,
    post,
    format!("/api/v1/teams/{}/leave", TEAM_ID)
);
test_unauthorized!(
    test_transfer_captaincy_unauthorized,
    post,
    format!("/api/v1/teams/{}/transfer", TEAM_ID),
    serde_json::json!({ "newCaptainId": MEMBER_ID })
);

// Team members
test_unauthorized!(
    test_approve_member_unauthorized,
    post,
    format!("/api/v1/team-members/{}/approve", MEMBER_ID)
);
test_unauthorized!(
    test_reject_member_unauthorized,
    post,
    format!("/api/v1/team-members/{}/reject", MEMBER_ID)
);
test_unauthorized!(
    test_kick_member_unauthorized,
    delete,
    format!("/api/v1/team-members/{}", MEMBER_ID)
);

// Admin console
test_unauthorized!(
    test_admin_teams_unauthorized,
    get,
    "/api/v1/admin/teams?status=pending".to_string()
);
test_unauthorized!(
    test_admin_approve_team_unauthorized,
    post,
    format!("/api/v1/admin/teams/{}/approve", TEAM_ID)
);
test_unauthorized!(
    test_admin_reject_team_unauthorized,
    post,
    format!("/api/v1/admin/teams/{}/reject", TEAM_ID)
);
test_unauthorized!(test_admin_users_unauthorized, get, "/api/v1/admin/users".to_string());
test_unauthorized!(
    test_admin_update_role_unauthorized,
    put,
    format!("/api/v1/admin/users/{}/role", MEMBER_ID),
    serde_json::json!({ "isAdmin": true })
);
test_unauthorized!(
    test_admin_events_unauthorized,
    get,
    "/api/v1/admin/events".to_string()
);
test_unauthorized!(
    test_admin_create_sponsor_unauthorized,
    post,
    "/api/v1/admin/sponsors".to_string(),
    serde_json::json!({ "name": "Acme", "tier": "gold" })
);
test_unauthorized!(
    test_admin_delete_stream_unauthorized,
    delete,
    format!("/api/v1/admin/streams/{}", TEAM_ID)
);

// Uploads
test_unauthorized!(
    test_upload_unauthorized,
    post,
    "/api/v1/uploads/team-logos".to_string()
);

#[actix_web::test]
#[serial]
async fn test_token_signed_with_unknown_secret_is_rejected() {
    common::setup_test_env();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::test_config()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", common::foreign_token())))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn test_non_bearer_authorization_is_rejected() {
    common::setup_test_env();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::test_config()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/teams/mine")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
