// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const PASSWORD: &str = "Espresso42x";

/// Helper to create a router over a fresh in-memory store.
fn create_test_app() -> Router {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    build_router(AppState::new(persistence, RosterSettings::default()))
}

/// Sends one request and returns the status and decoded JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (HttpStatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login_token(app: &Router, login_name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "login_name": login_name, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "login failed: {body}");
    body["session_token"].as_str().unwrap().to_string()
}

/// Bootstraps `root` and returns its session token.
async fn bootstrap(app: &Router) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/bootstrap",
        None,
        Some(json!({
            "login_name": "root",
            "display_name": "Roaster Root",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    login_token(app, "root").await
}

async fn create_shop_as(app: &Router, token: &str, name: &str, code: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/shops",
        Some(token),
        Some(json!({ "name": name, "short_code": code, "minimum_workers": 2 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED, "create shop failed: {body}");
    body["shop_id"].as_i64().unwrap()
}

async fn hire(app: &Router, token: &str, shop_id: i64, login_name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/workers",
        Some(token),
        Some(json!({
            "shop_id": shop_id,
            "name": login_name.to_uppercase(),
            "contact": format!("{login_name}@example.com"),
            "experience_start": "2020-03-10",
            "login_name": login_name,
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED, "hire failed: {body}");
    body["worker_id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_bootstrap_login_and_whoami() {
    let app = create_test_app();
    let token = bootstrap(&app).await;

    let (status, me) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(me["role"], "SUPER_ADMIN");
    assert_eq!(me["login_name"], "root");

    let (again, _) = send(
        &app,
        "POST",
        "/auth/bootstrap",
        None,
        Some(json!({
            "login_name": "other",
            "display_name": "Other",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
        })),
    )
    .await;
    assert_eq!(again, HttpStatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_or_bad_session_is_unauthorized() {
    let app = create_test_app();
    bootstrap(&app).await;

    let (missing, body) = send(&app, "GET", "/auth/me", None, None).await;
    assert_eq!(missing, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);

    let (bogus, _) = send(&app, "GET", "/shops", Some("not-a-token"), None).await;
    assert_eq!(bogus, HttpStatusCode::UNAUTHORIZED);

    let (wrong_password, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "login_name": "root", "password": "Espresso42y" })),
    )
    .await;
    assert_eq!(wrong_password, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = create_test_app();
    let token = bootstrap(&app).await;

    let (status, _) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::NO_CONTENT);

    let (after, _) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(after, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shop_endpoints() {
    let app = create_test_app();
    let token = bootstrap(&app).await;
    let central = create_shop_as(&app, &token, "Central", "CEN").await;

    let (duplicate, _) = send(
        &app,
        "POST",
        "/shops",
        Some(&token),
        Some(json!({ "name": "Elsewhere", "short_code": "CEN" })),
    )
    .await;
    assert_eq!(duplicate, HttpStatusCode::CONFLICT);

    let (status, shop) = send(&app, "GET", "/shops/by-slug/central", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(shop["shop_id"].as_i64(), Some(central));

    let (missing, _) = send(&app, "GET", "/shops/by-slug/nowhere", Some(&token), None).await;
    assert_eq!(missing, HttpStatusCode::NOT_FOUND);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/shops/{central}"),
        Some(&token),
        Some(json!({ "name": "Central", "short_code": "CTR", "minimum_workers": 3 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(updated["short_code"], "CTR");

    let (status, _) = send(&app, "DELETE", &format!("/shops/{central}"), Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::NO_CONTENT);

    let (status, list) = send(&app, "GET", "/shops", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(list["shops"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_cell_edits_and_grid() {
    let app = create_test_app();
    let root = bootstrap(&app).await;
    let central = create_shop_as(&app, &root, "Central", "CEN").await;
    let ana = hire(&app, &root, central, "ana").await;

    let (status, edit) = send(
        &app,
        "POST",
        &format!("/shops/{central}/cells"),
        Some(&root),
        Some(json!({ "worker_id": ana, "date": "2024-03-05", "value": "9.30" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK, "{edit}");
    assert_eq!(edit["outcome"], "created");
    assert_eq!(edit["display"], "09:30");

    let (bad, body) = send(
        &app,
        "POST",
        &format!("/shops/{central}/cells"),
        Some(&root),
        Some(json!({ "worker_id": ana, "date": "2024-03-06", "value": "ABC" })),
    )
    .await;
    assert_eq!(bad, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);

    let (own_shop, _) = send(
        &app,
        "POST",
        &format!("/shops/{central}/cells"),
        Some(&root),
        Some(json!({ "worker_id": ana, "date": "2024-03-06", "value": "CEN" })),
    )
    .await;
    assert_eq!(own_shop, HttpStatusCode::UNPROCESSABLE_ENTITY);

    let worker_token = login_token(&app, "ana").await;
    let (forbidden, _) = send(
        &app,
        "POST",
        &format!("/shops/{central}/cells"),
        Some(&worker_token),
        Some(json!({ "worker_id": ana, "date": "2024-03-06", "value": "+" })),
    )
    .await;
    assert_eq!(forbidden, HttpStatusCode::FORBIDDEN);

    let (status, grid) = send(
        &app,
        "GET",
        &format!("/shops/{central}/grid?year=2024&month=3"),
        Some(&worker_token),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(grid["dates"].as_array().unwrap().len(), 31);
    assert_eq!(grid["rows"][0]["cells"][4]["display"], "09:30");
    assert_eq!(grid["days"][4]["coverage"], 1);
    assert_eq!(grid["days"][4]["understaffed"], true);

    let (bad_month, _) = send(
        &app,
        "GET",
        &format!("/shops/{central}/grid?year=2024&month=13"),
        Some(&root),
        None,
    )
    .await;
    assert_eq!(bad_month, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_exchange_over_http() {
    let app = create_test_app();
    let root = bootstrap(&app).await;
    let central = create_shop_as(&app, &root, "Central", "CEN").await;
    let ana = hire(&app, &root, central, "ana").await;
    let bob = hire(&app, &root, central, "bob").await;

    send(
        &app,
        "POST",
        &format!("/shops/{central}/cells"),
        Some(&root),
        Some(json!({ "worker_id": ana, "date": "2024-03-05", "value": "+" })),
    )
    .await;
    let (_, grid) = send(
        &app,
        "GET",
        &format!("/shops/{central}/grid?year=2024&month=3"),
        Some(&root),
        None,
    )
    .await;
    let shift_id = grid["rows"][0]["cells"][4]["shift_id"].as_i64().unwrap();

    let ana_token = login_token(&app, "ana").await;
    let bob_token = login_token(&app, "bob").await;

    let (status, offered) = send(
        &app,
        "POST",
        "/requests",
        Some(&ana_token),
        Some(json!({ "shift_id": shift_id })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED, "{offered}");
    let request_id = offered["request_id"].as_i64().unwrap();

    let (duplicate, _) = send(
        &app,
        "POST",
        "/requests",
        Some(&ana_token),
        Some(json!({ "shift_id": shift_id, "reason": "again" })),
    )
    .await;
    assert_eq!(duplicate, HttpStatusCode::CONFLICT);

    let approve_uri = format!("/requests/{request_id}/approve");
    let (unclaimed, _) = send(&app, "POST", &approve_uri, Some(&root), None).await;
    assert_eq!(unclaimed, HttpStatusCode::UNPROCESSABLE_ENTITY);

    let (status, taken) = send(
        &app,
        "POST",
        &format!("/requests/{request_id}/take"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(taken["taken_by"].as_i64(), Some(bob));

    let (status, mine) = send(&app, "GET", "/requests/mine", Some(&bob_token), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(mine["requests"].as_array().unwrap().len(), 1);

    let (status, approved) = send(&app, "POST", &approve_uri, Some(&root), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(approved["status"], "approved");

    let (again, _) = send(&app, "POST", &approve_uri, Some(&root), None).await;
    assert_eq!(again, HttpStatusCode::CONFLICT);

    let (status, listed) = send(
        &app,
        "GET",
        &format!("/shops/{central}/requests?status=approved"),
        Some(&root),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(listed["requests"][0]["request_id"].as_i64(), Some(request_id));

    let (bad_status, _) = send(
        &app,
        "GET",
        &format!("/shops/{central}/requests?status=bogus"),
        Some(&root),
        None,
    )
    .await;
    assert_eq!(bad_status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_worker_endpoints() {
    let app = create_test_app();
    let root = bootstrap(&app).await;
    let central = create_shop_as(&app, &root, "Central", "CEN").await;
    let ana = hire(&app, &root, central, "ana").await;

    let (status, signup) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": "Noa",
            "login_name": "noa",
            "password": PASSWORD,
            "password_confirmation": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CREATED, "{signup}");
    let noa = signup["worker_id"].as_i64().unwrap();
    assert!(signup["home_shop_id"].is_null());

    let (status, waiting) = send(&app, "GET", "/workers/unassigned", Some(&root), None).await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(waiting["workers"][0]["worker_id"].as_i64(), Some(noa));

    let (status, assigned) = send(
        &app,
        "POST",
        &format!("/workers/{noa}/assign"),
        Some(&root),
        Some(json!({ "shop_id": central })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(assigned["home_shop_id"].as_i64(), Some(central));

    let ana_token = login_token(&app, "ana").await;
    let (status, own) = send(
        &app,
        "GET",
        &format!("/workers/{ana}"),
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(own["contact"], "ana@example.com");

    let (forbidden, _) = send(
        &app,
        "GET",
        &format!("/workers/{noa}"),
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(forbidden, HttpStatusCode::FORBIDDEN);

    let (status, vacation) = send(
        &app,
        "POST",
        &format!("/workers/{ana}/vacation"),
        Some(&ana_token),
        Some(json!({ "start_date": "2024-07-01" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(vacation["vacation_start"], "2024-07-01");

    let (status, fired) = send(
        &app,
        "POST",
        &format!("/workers/{ana}/fire"),
        Some(&root),
        Some(json!({ "fired_at": "2024-04-01" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(fired["fired_at"], "2024-04-01");

    let (status, listed) = send(
        &app,
        "GET",
        &format!("/shops/{central}/workers"),
        Some(&root),
        None,
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(listed["workers"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        "POST",
        "/shop_admins",
        Some(&root),
        Some(json!({ "login_name": "noa", "shop_id": central })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let admin_token = login_token(&app, "noa").await;
    let (_, me) = send(&app, "GET", "/auth/me", Some(&admin_token), None).await;
    assert_eq!(me["role"], "SHOP_ADMIN");
}

#[test]
fn test_api_errors_map_to_status_codes() {
    let cases: Vec<(ApiError, StatusCode)> = vec![
        (
            ApiError::AuthenticationFailed {
                reason: String::from("no"),
            },
            StatusCode::UNAUTHORIZED,
        ),
        (
            ApiError::Forbidden {
                action: String::from("edit"),
                reason: String::from("no"),
            },
            StatusCode::FORBIDDEN,
        ),
        (
            ApiError::ResourceNotFound {
                resource_type: String::from("Shop"),
                message: String::from("gone"),
            },
            StatusCode::NOT_FOUND,
        ),
        (
            ApiError::Conflict {
                reason: String::from("pending"),
            },
            StatusCode::CONFLICT,
        ),
        (
            ApiError::InvalidOperation {
                reason: String::from("unclaimed"),
            },
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            ApiError::ParseError {
                input: String::from("ABC"),
                message: String::from("unknown"),
            },
            StatusCode::BAD_REQUEST,
        ),
        (
            ApiError::PasswordPolicyViolation {
                message: String::from("short"),
            },
            StatusCode::BAD_REQUEST,
        ),
        (
            ApiError::Internal {
                message: String::from("boom"),
            },
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(HttpError::from(err).status, expected);
    }
}

#[test]
fn test_off_words_flag_replaces_defaults() {
    let args: Args = Args::parse_from(["brew-roster-server", "--off-word", "rest"]);
    let settings: RosterSettings = build_settings(&args).unwrap();
    assert_eq!(settings.cell_parser.off_words(), ["rest".to_string()]);

    let defaults: RosterSettings =
        build_settings(&Args::parse_from(["brew-roster-server"])).unwrap();
    assert_eq!(defaults.cell_parser.off_words().len(), 5);

    let bad_zone = Args::parse_from(["brew-roster-server", "--timezone", "Mars/Olympus"]);
    assert!(matches!(
        build_settings(&bad_zone),
        Err(StartupError::Config(_))
    ));
}
