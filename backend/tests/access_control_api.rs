use axum::http::{header, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;
use unimarket_backend::{
    models::user::Role,
    session::token::{self, SessionClaims},
};

mod support;

fn expired_token(role: Role, minutes_ago: i64) -> String {
    let claims = SessionClaims::new(
        "user-expired".into(),
        role,
        "expired@campus.edu".into(),
        Utc::now() - Duration::minutes(minutes_ago),
        Duration::minutes(30),
    );
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(support::TEST_SECRET.as_ref()),
    )
    .expect("encode token")
}

fn assert_security_headers(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(headers[header::X_XSS_PROTECTION], "1; mode=block");
    assert_eq!(
        headers[header::STRICT_TRANSPORT_SECURITY],
        "max-age=31536000; includeSubDomains"
    );
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    assert_eq!(
        headers[header::REFERRER_POLICY],
        "strict-origin-when-cross-origin"
    );
}

#[tokio::test]
async fn buyer_on_admin_route_is_sent_home() {
    let app = support::test_app();
    let buyer = support::seed_user(&app.store, Role::Buyer, "buyer@campus.edu").await;
    let token = support::issue_token(&buyer, &app.config);

    let response = app
        .router
        .oneshot(support::get_with_cookie(
            "/admin/dashboard",
            &support::session_cookie(&token),
        ))
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert_security_headers(&response);
}

#[tokio::test]
async fn admin_on_admin_route_is_allowed() {
    let app = support::test_app();
    let admin = support::seed_user(&app.store, Role::Admin, "admin@campus.edu").await;
    let token = support::issue_token(&admin, &app.config);

    let response = app
        .router
        .oneshot(support::get_with_cookie(
            "/admin/dashboard",
            &support::session_cookie(&token),
        ))
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_security_headers(&response);
    let json = support::body_json(response).await;
    assert_eq!(json["page"], "admin_dashboard");
}

#[tokio::test]
async fn seller_on_admin_route_is_sent_home_too() {
    let app = support::test_app();
    let seller = support::seed_user(&app.store, Role::Seller, "seller@campus.edu").await;
    let token = support::issue_token(&seller, &app.config);

    let response = app
        .router
        .oneshot(support::get_with_cookie(
            "/admin",
            &support::session_cookie(&token),
        ))
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn expired_token_redirects_to_login() {
    let app = support::test_app();
    let token = expired_token(Role::Seller, 31);

    let response = app
        .router
        .oneshot(support::get_with_cookie(
            "/my-products",
            &support::session_cookie(&token),
        ))
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");
    assert_security_headers(&response);
}

#[tokio::test]
async fn missing_token_redirects_protected_but_not_public() {
    let app = support::test_app();

    let protected = app
        .router
        .clone()
        .oneshot(support::get("/products/new"))
        .await
        .expect("send request");
    assert_eq!(protected.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(protected.headers()[header::LOCATION], "/login");

    let public = app
        .router
        .oneshot(support::get("/"))
        .await
        .expect("send request");
    assert_eq!(public.status(), StatusCode::OK);
    assert!(!public.headers().contains_key(header::LOCATION));
    assert_security_headers(&public);
}

#[tokio::test]
async fn garbage_token_is_treated_as_absent() {
    let app = support::test_app();

    let protected = app
        .router
        .clone()
        .oneshot(support::get_with_cookie(
            "/my-products",
            "session_token=not.a.token",
        ))
        .await
        .expect("send request");
    assert_eq!(protected.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(protected.headers()[header::LOCATION], "/login");

    // On a public route the bad token simply means "anonymous visitor".
    let public = app
        .router
        .oneshot(support::get_with_cookie("/", "session_token=not.a.token"))
        .await
        .expect("send request");
    assert_eq!(public.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_signature_token_redirects_to_login() {
    let app = support::test_app();
    let claims = SessionClaims::new(
        "user-forged".into(),
        Role::Admin,
        "forged@campus.edu".into(),
        Utc::now(),
        Duration::minutes(30),
    );
    let forged = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret("attacker-secret".as_ref()),
    )
    .expect("encode token");

    let response = app
        .router
        .oneshot(support::get_with_cookie(
            "/admin",
            &support::session_cookie(&forged),
        ))
        .await
        .expect("send request");

    // A forged admin token is unauthenticated, not unauthorized.
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn token_past_the_update_age_gets_a_refreshed_cookie() {
    // A lifetime longer than the re-validation horizon, so a token can be
    // stale without being expired.
    let mut config = support::test_config();
    config.session_max_age_minutes = 25 * 60;
    let app = support::test_app_with_config(config);

    let stale = SessionClaims::new(
        "user-stale".into(),
        Role::Buyer,
        "stale@campus.edu".into(),
        Utc::now() - Duration::hours(24) - Duration::minutes(30),
        Duration::minutes(25 * 60),
    );
    let old_token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &stale,
        &jsonwebtoken::EncodingKey::from_secret(support::TEST_SECRET.as_ref()),
    )
    .expect("encode token");

    let response = app
        .router
        .oneshot(support::get_with_cookie(
            "/my-products",
            &support::session_cookie(&old_token),
        ))
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = support::cookie_token(&response).expect("refreshed session cookie");
    assert_ne!(refreshed, old_token);
    let claims = token::verify(&refreshed, support::TEST_SECRET).expect("verify");
    assert_eq!(claims.sub, "user-stale");
    assert_eq!(claims.role, Role::Buyer);
    assert!(claims.iat > stale.iat);
}

#[tokio::test]
async fn fresh_token_rides_through_without_a_new_cookie() {
    let app = support::test_app();
    let buyer = support::seed_user(&app.store, Role::Buyer, "buyer@campus.edu").await;
    let token = support::issue_token(&buyer, &app.config);

    let response = app
        .router
        .oneshot(support::get_with_cookie(
            "/my-products",
            &support::session_cookie(&token),
        ))
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn authenticated_buyer_reaches_the_shared_protected_pages() {
    let app = support::test_app();
    let buyer = support::seed_user(&app.store, Role::Buyer, "buyer@campus.edu").await;
    let token = support::issue_token(&buyer, &app.config);
    let cookie = support::session_cookie(&token);

    for uri in ["/my-products", "/products/new"] {
        let response = app
            .router
            .clone()
            .oneshot(support::get_with_cookie(uri, &cookie))
            .await
            .expect("send request");
        assert_eq!(response.status(), StatusCode::OK, "at {}", uri);
    }
}

#[tokio::test]
async fn public_listing_paths_are_never_gated() {
    let app = support::test_app();

    // Not under /products/new, so not protected; 404 because the storefront
    // page itself is out of scope, but crucially no redirect.
    let response = app
        .router
        .oneshot(support::get("/products/123"))
        .await
        .expect("send request");
    assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_security_headers(&response);
}
