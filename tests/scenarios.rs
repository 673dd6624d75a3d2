//! End-to-end tests for the scenario runner
//!
//! Each test stands up a mock server that plays the restaurant API, runs
//! scenarios against it and checks the result, the failure class and the
//! requests that were actually sent.

use apicheck::{FailureKind, RunnerConfig, ScenarioRunner, Templates};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const SESSION_COOKIE: &str = ".AspNetCore.Identity.Application=CfDJ8abc; path=/; httponly";

// =============================================================================
// Test Utilities
// =============================================================================

/// Quiet runner pointed at the mock server with a fixed stamp
fn runner(server: &MockServer, stamp: u64) -> ScenarioRunner {
    let mut config = RunnerConfig::new(server.uri());
    config.stamp = stamp;
    ScenarioRunner::new(config, Templates::default())
}

/// Matches requests that carry no cookies
struct NoCookie;

impl Match for NoCookie {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("cookie")
    }
}

async fn mock_register(server: &MockServer, email: &str) {
    Mock::given(method("POST"))
        .and(path("/api/Auth/register"))
        .and(body_partial_json(json!({"email": email, "confirmPassword": "Test123!"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", SESSION_COOKIE)
                .set_body_json(json!({"success": true})),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mock_login(server: &MockServer, email: &str, set_cookie: bool) {
    let mut response = ResponseTemplate::new(200).set_body_json(json!({"success": true}));
    if set_cookie {
        response = response.insert_header("set-cookie", SESSION_COOKIE);
    }

    Mock::given(method("POST"))
        .and(path("/api/Auth/login"))
        .and(body_partial_json(json!({"email": email, "rememberMe": false})))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mock_menu_listing(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/Menu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_auth_passes_when_login_issues_cookie() {
    let server = MockServer::start().await;
    mock_register(&server, "test_user_100@example.com").await;
    mock_login(&server, "test_user_100@example.com", true).await;

    let result = runner(&server, 100).run_id("auth").await.unwrap();

    assert!(result.passed(), "trace: {:#?}", result.trace());
    assert_eq!(result.steps_run(), 3);
    assert!(result.failure().is_none());
    assert!(result
        .trace()
        .iter()
        .any(|line| line == "✓ Authentication cookie received"));
}

#[tokio::test]
async fn test_auth_fails_without_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/register"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    mock_login(&server, "test_user_100@example.com", false).await;

    let result = runner(&server, 100).run_id("auth").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::Assertion));
    assert_eq!(result.steps_run(), 3);
}

#[tokio::test]
async fn test_auth_stops_at_rejected_registration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_string("DuplicateUserName"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = runner(&server, 100).run_id("auth").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::UnexpectedStatus));
    assert_eq!(result.steps_run(), 1);
    assert!(result
        .trace()
        .iter()
        .any(|line| line == "Response: DuplicateUserName"));
}

#[tokio::test]
async fn test_reruns_with_new_stamp_use_new_email() {
    let server = MockServer::start().await;
    mock_register(&server, "test_user_200@example.com").await;
    mock_register(&server, "test_user_201@example.com").await;
    mock_login(&server, "test_user_200@example.com", true).await;
    mock_login(&server, "test_user_201@example.com", true).await;

    let first = runner(&server, 200).run_id("auth").await.unwrap();
    let second = runner(&server, 201).run_id("auth").await.unwrap();

    assert!(first.passed());
    assert!(second.passed());
    assert_ne!(first.stamp(), second.stamp());
}

// =============================================================================
// Menu management
// =============================================================================

async fn mock_admin_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/Auth/login"))
        .and(body_partial_json(json!({"email": "admin@restaurant.com", "password": "Admin123!"})))
        .and(NoCookie)
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", SESSION_COOKIE)
                .set_body_json(json!({"success": true})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_menu_item_is_created_and_verified() {
    let server = MockServer::start().await;
    mock_admin_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/Menu"))
        .and(body_partial_json(json!({
            "name": "Test Item 300",
            "price": 12.99,
            "category": "Test",
            "isAvailable": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "name": "Test Item 300",
            "price": 12.99
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Menu/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": "Test Item 300",
            "description": "Created by API test",
            "price": 12.99,
            "category": "Test",
            "isAvailable": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = runner(&server, 300).run_id("menu").await.unwrap();

    assert!(result.passed(), "trace: {:#?}", result.trace());
    assert_eq!(result.steps_run(), 3);
    assert!(result
        .trace()
        .iter()
        .any(|line| line == "✓ Menu item created successfully, ID: 42"));
}

#[tokio::test]
async fn test_menu_price_mismatch_fails() {
    let server = MockServer::start().await;
    mock_admin_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/Menu"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 8})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Menu/8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 8, "name": "Test Item 300", "price": 13.0})),
        )
        .mount(&server)
        .await;

    let result = runner(&server, 300).run_id("menu").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::Assertion));
}

#[tokio::test]
async fn test_menu_creation_without_id_is_indeterminate() {
    let server = MockServer::start().await;
    mock_admin_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/Menu"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "Test Item 300"})))
        .mount(&server)
        .await;

    let result = runner(&server, 300).run_id("menu").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::IndeterminateIdentifier));
    assert_eq!(result.steps_run(), 2);
}

#[tokio::test]
async fn test_menu_creation_wrong_status_fails() {
    let server = MockServer::start().await;
    mock_admin_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/Menu"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = runner(&server, 300).run_id("menu").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::UnexpectedStatus));
}

// =============================================================================
// Order system
// =============================================================================

#[tokio::test]
async fn test_order_with_wrapped_collections() {
    let server = MockServer::start().await;
    mock_register(&server, "order_test_400@example.com").await;
    mock_menu_listing(
        &server,
        json!({"$id": "1", "$values": [
            {"$id": "2", "id": 1, "name": "Burger", "price": 10.0},
            {"$id": "3", "id": 2, "name": "Fries", "price": 4.5},
            {"$id": "4", "id": 3, "name": "Soda", "price": 2.0}
        ]}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/Orders"))
        .and(body_partial_json(json!({
            "reservationId": null,
            "items": [
                {"menuItemId": 1, "quantity": 2},
                {"menuItemId": 2, "quantity": 1}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5, "totalAmount": 24.5})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Orders/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "$id": "1",
            "id": 5,
            "totalAmount": 24.5,
            "orderItems": {"$id": "2", "$values": [
                {"id": 10, "menuItemId": 1, "quantity": 2, "price": 10.0},
                {"id": 11, "menuItemId": 2, "quantity": 1, "price": 4.5}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = runner(&server, 400).run_id("order").await.unwrap();

    assert!(result.passed(), "trace: {:#?}", result.trace());
    assert_eq!(result.steps_run(), 4);
    assert!(result.trace().iter().any(|line| line == "Order items count: 2"));
    assert!(result.trace().iter().any(|line| line == "✓ Retrieved 3 menu items"));
}

#[tokio::test]
async fn test_order_id_from_location_header() {
    let server = MockServer::start().await;
    mock_register(&server, "order_test_401@example.com").await;
    mock_menu_listing(&server, json!([{"id": 9, "name": "Soup", "price": 6.0}])).await;
    Mock::given(method("POST"))
        .and(path("/api/Orders"))
        .and(body_partial_json(json!({"items": [{"menuItemId": 9, "quantity": 2}]})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("location", format!("{}/api/Orders/77", server.uri()))
                .set_body_json(json!({"status": 0})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Orders/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 77,
            "totalAmount": 12.0,
            "orderItems": [{"id": 1, "menuItemId": 9, "quantity": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = runner(&server, 401).run_id("order").await.unwrap();

    assert!(result.passed(), "trace: {:#?}", result.trace());
    assert!(result
        .trace()
        .iter()
        .any(|line| line == "✓ Order created successfully, ID: 77"));
}

#[tokio::test]
async fn test_order_without_identifier_is_indeterminate() {
    let server = MockServer::start().await;
    mock_register(&server, "order_test_402@example.com").await;
    mock_menu_listing(&server, json!([{"id": 1, "price": 1.0}])).await;
    Mock::given(method("POST"))
        .and(path("/api/Orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = runner(&server, 402).run_id("order").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::IndeterminateIdentifier));
    assert_eq!(result.steps_run(), 3);
}

#[tokio::test]
async fn test_order_fails_on_empty_menu() {
    let server = MockServer::start().await;
    mock_register(&server, "order_test_403@example.com").await;
    mock_menu_listing(&server, json!({"$id": "1", "$values": []})).await;
    Mock::given(method("POST"))
        .and(path("/api/Orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let result = runner(&server, 403).run_id("order").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::Assertion));
    assert_eq!(result.steps_run(), 2);
}

#[tokio::test]
async fn test_order_without_items_fails() {
    let server = MockServer::start().await;
    mock_register(&server, "order_test_404@example.com").await;
    mock_menu_listing(&server, json!([{"id": 1, "price": 1.0}])).await;
    Mock::given(method("POST"))
        .and(path("/api/Orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Orders/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "totalAmount": 0,
            "orderItems": {"$values": []}
        })))
        .mount(&server)
        .await;

    let result = runner(&server, 404).run_id("order").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::Assertion));
    assert_eq!(result.steps_run(), 4);
}

#[tokio::test]
async fn test_order_without_total_fails() {
    let server = MockServer::start().await;
    mock_register(&server, "order_test_405@example.com").await;
    mock_menu_listing(&server, json!([{"id": 1, "price": 1.0}])).await;
    Mock::given(method("POST"))
        .and(path("/api/Orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 6})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Orders/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 6,
            "totalAmount": null,
            "orderItems": [{"id": 1}]
        })))
        .mount(&server)
        .await;

    let result = runner(&server, 405).run_id("order").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::Assertion));
}

// =============================================================================
// Runner behavior
// =============================================================================

#[tokio::test]
async fn test_unreachable_server_is_connectivity_failure() {
    // Bind and release a port so nothing is listening on it
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base_url = format!("http://127.0.0.1:{}", port);

    let runner = ScenarioRunner::new(RunnerConfig::new(base_url.clone()), Templates::default());
    let result = runner.run_id("auth").await.unwrap();

    assert!(!result.passed());
    assert_eq!(result.failure_kind(), Some(FailureKind::Connectivity));
    assert_eq!(result.steps_run(), 1);
    assert!(result
        .trace()
        .iter()
        .any(|line| line == &format!("Current base URL: {}", base_url)));
}

#[tokio::test]
async fn test_failed_scenario_does_not_stop_the_next() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/login"))
        .and(body_partial_json(json!({"email": "admin@restaurant.com"})))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mock_register(&server, "test_user_500@example.com").await;
    mock_login(&server, "test_user_500@example.com", true).await;

    let report = runner(&server, 500).run_ids(&["menu", "auth"]).await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    assert!(!report.all_passed());
    assert!(!report.results[0].passed());
    assert!(report.results[1].passed());
}

#[tokio::test]
async fn test_sessions_are_not_shared_between_scenarios() {
    let server = MockServer::start().await;
    mock_register(&server, "test_user_600@example.com").await;
    mock_login(&server, "test_user_600@example.com", true).await;
    // Admin login only matches a cookie-less request
    mock_admin_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/Menu"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Menu/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "name": "Test Item 600", "price": 12.99})),
        )
        .mount(&server)
        .await;

    let report = runner(&server, 600).run_ids(&["auth", "menu"]).await.unwrap();

    assert!(report.all_passed(), "report: {:#?}", report);
}

#[tokio::test]
async fn test_verbose_trace_includes_response_details() {
    let server = MockServer::start().await;
    mock_register(&server, "test_user_700@example.com").await;
    mock_login(&server, "test_user_700@example.com", true).await;

    let mut config = RunnerConfig::new(server.uri());
    config.stamp = 700;
    config.verbose = true;
    let result = ScenarioRunner::new(config, Templates::default())
        .run_id("auth")
        .await
        .unwrap();

    assert!(result.passed());
    assert!(result
        .trace()
        .iter()
        .any(|line| line == "Email: test_user_700@example.com"));
}

#[tokio::test]
async fn test_result_serializes_failure_class() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Auth/register"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = runner(&server, 800).run_ids(&["auth"]).await.unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["failed"], 1);
    assert_eq!(value["results"][0]["id"], "auth");
    assert_eq!(value["results"][0]["passed"], false);
    assert_eq!(value["results"][0]["failure"]["kind"], "unexpected_status");
}

// =============================================================================
// Suite files
// =============================================================================

#[tokio::test]
async fn test_suite_templates_shape_the_requests() {
    let suite_path =
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/order_single.yaml");
    let suite = apicheck::scenario::SuiteFile::load(&suite_path).unwrap();
    let templates = suite.templates(&Templates::default()).unwrap();

    let server = MockServer::start().await;
    mock_register(&server, "suite_900@example.com").await;
    mock_menu_listing(&server, json!([{"id": 4, "price": 3.0}, {"id": 5, "price": 1.0}])).await;
    Mock::given(method("POST"))
        .and(path("/api/Orders"))
        .and(body_partial_json(json!({"items": [{"menuItemId": 4, "quantity": 1}]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Orders/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "totalAmount": 3.0,
            "orderItems": [{"id": 1, "menuItemId": 4, "quantity": 1}]
        })))
        .mount(&server)
        .await;

    let mut config = RunnerConfig::new(server.uri());
    config.stamp = 900;
    let report = ScenarioRunner::new(config, templates)
        .run_ids(suite.scenarios.as_slice())
        .await
        .unwrap();

    assert_eq!(suite.name, "Single-line order");
    assert!(report.all_passed(), "report: {:#?}", report);
}
