mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use url_shortener_microservice::domain::repositories::MappingRepository;
use url_shortener_microservice::routes::service_router;

#[tokio::test]
async fn test_shorten_form_body() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/shorturl")
        .form(&[("url", "https://www.freecodecamp.org")])
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "original_url": "https://www.freecodecamp.org",
        "short_url": 1
    }));
}

#[tokio::test]
async fn test_shorten_json_body() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/shorturl")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["original_url"], "https://example.com");
    assert_eq!(json["short_url"], 1);
}

#[tokio::test]
async fn test_shorten_json_content_type_is_case_insensitive() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/shorturl")
        .bytes(json!({ "url": "https://example.com" }).to_string().into())
        .content_type("Application/JSON")
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "original_url": "https://example.com",
        "short_url": 1
    }));
}

#[tokio::test]
async fn test_shorten_json_suffix_content_type() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/shorturl")
        .bytes(json!({ "url": "https://example.org" }).to_string().into())
        .content_type("application/vnd.api+json")
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "original_url": "https://example.org",
        "short_url": 1
    }));
}

#[tokio::test]
async fn test_shorten_scenario_is_idempotent_and_sequential() {
    let (server, repo) = common::create_test_server();

    let first = server
        .post("/api/shorturl")
        .form(&[("url", "https://example.com")])
        .await
        .json::<serde_json::Value>();
    let second = server
        .post("/api/shorturl")
        .form(&[("url", "https://example.org")])
        .await
        .json::<serde_json::Value>();
    let again = server
        .post("/api/shorturl")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json::<serde_json::Value>();

    assert_eq!(first["short_url"], 1);
    assert_eq!(second["short_url"], 2);
    assert_eq!(again["short_url"], 1);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let (server, repo) = common::create_test_server();

    for bad in ["not-a-valid-url", "ftp:/john-doe.org", ""] {
        let response = server
            .post("/api/shorturl")
            .form(&[("url", bad)])
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "invalid url" }));
    }

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shorten_missing_url_field() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/shorturl")
        .json(&json!({ "link": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "invalid url" }));

    let response = server.post("/api/shorturl").text("garbage").await;
    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "invalid url" }));
}

#[tokio::test]
async fn test_shorten_database_error() {
    let server = TestServer::new(service_router(common::create_failing_state())).unwrap();

    let response = server
        .post("/api/shorturl")
        .form(&[("url", "https://example.com")])
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Database error" }));
}

#[tokio::test]
async fn test_hello_endpoint() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/hello").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "greeting": "hello API" }));
}
