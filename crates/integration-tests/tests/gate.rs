//! Tests for the request gate: which routes need a session, which are
//! exempt, and how anonymous requests are handled.

use axum::http::{StatusCode, header};

use harborview_integration_tests::{TEST_BASE_URL, app, body_string, send};

#[tokio::test]
async fn test_home_renders_for_anonymous_visitors() {
    let app = app();
    let response = send(&app, "GET", "/", None, None).await;

    // Content API is down in tests; the page degrades, it does not error
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Harborview Museum"));
}

#[tokio::test]
async fn test_health_is_ungated() {
    let app = app();
    let response = send(&app, "GET", "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_reports_database_outage() {
    let app = app();
    let response = send(&app, "GET", "/health/ready", None, None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_account_redirects_anonymous_to_login() {
    let app = app();
    let response = send(&app, "GET", "/account", None, None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/auth/login")
    );
}

#[tokio::test]
async fn test_api_is_exempt_from_redirects() {
    // API routes authorize themselves; anonymous callers get 403 JSON, not
    // a redirect to the login page
    let app = app();
    let response = send(&app, "GET", "/api/admin/role", None, None).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_page_renders() {
    let app = app();
    let response = send(&app, "GET", "/auth/login", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Sign in"));
}

#[tokio::test]
async fn test_login_error_code_is_displayed() {
    let app = app();
    let response = send(&app, "GET", "/auth/login?error=credentials", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_robots_txt() {
    let app = app();
    let response = send(&app, "GET", "/robots.txt", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Disallow: /studio/"));
    assert!(body.contains("Disallow: /api/"));
    assert!(body.contains(&format!("Sitemap: {TEST_BASE_URL}/sitemap.xml")));
}

#[tokio::test]
async fn test_sitemap_degrades_to_static_routes() {
    let app = app();
    let response = send(&app, "GET", "/sitemap.xml", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(&format!("<loc>{TEST_BASE_URL}/exhibits</loc>")));
    assert!(body.contains(&format!("<loc>{TEST_BASE_URL}/donate</loc>")));
}

#[tokio::test]
async fn test_security_headers_are_applied() {
    let app = app();
    let response = send(&app, "GET", "/", None, None).await;

    let headers = response.headers();
    assert_eq!(
        headers.get("x-frame-options").and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
    assert_eq!(
        headers
            .get("x-content-type-options")
            .and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));
}
