//! HTTP contract tests for the record client

use serde_json::json;
use storyloom_client::{
    ClientConfig, ClientError, FormPayload, HttpRecordClient, ListOptions, RecordClient, Session,
};
use storyloom_core::{Filter, User};
use wiremock::matchers::{
    body_json, body_string_contains, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user() -> User {
    User {
        id: "u1".to_string(),
        email: "ada@example.com".to_string(),
        name: Some("Ada".to_string()),
        is_active: true,
        is_superuser: false,
        verified: true,
    }
}

async fn client_for(server: &MockServer, signed_in: bool) -> HttpRecordClient {
    let config = ClientConfig::with_urls(&server.uri(), &server.uri()).unwrap();
    let session = Session::in_memory();
    if signed_in {
        session.sign_in("raw-token", user()).unwrap();
    }
    HttpRecordClient::new(&config, session).unwrap()
}

#[tokio::test]
async fn test_authenticate_posts_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/users/auth-with-password"))
        .and(body_json(json!({"identity": "ada@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh-token",
            "record": {"id": "u1", "email": "ada@example.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, false).await;
    let auth = client
        .authenticate("users", "ada@example.com", "secret")
        .await
        .unwrap();
    assert_eq!(auth.token, "fresh-token");
    assert_eq!(auth.record["id"], "u1");
}

#[tokio::test]
async fn test_failed_authentication_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/users/auth-with-password"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "message": "Failed to authenticate.",
            "data": {"identity": {"code": "validation_required", "message": "Missing required value."}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, false).await;
    let err = client.authenticate("users", "", "x").await.unwrap_err();
    match err {
        ClientError::Validation { message, details } => {
            assert_eq!(message, "Failed to authenticate.");
            assert_eq!(details[0].field(), "identity");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_list_sends_filter_and_raw_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/project/records"))
        .and(query_param("page", "3"))
        .and(query_param("perPage", "5"))
        .and(query_param("filter", "user = \"u1\""))
        .and(header("Authorization", "raw-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 3,
            "perPage": 5,
            "totalItems": 11,
            "totalPages": 3,
            "items": [{"id": "p11", "user": "u1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, true).await;
    let options = ListOptions::filtered(Filter::eq("user", "u1"));
    let list = client.list("project", 3, 5, &options).await.unwrap();

    assert_eq!(list.total_items, 11);
    assert_eq!(list.total_pages, 3);
    assert_eq!(list.items.len(), 1);
}

#[tokio::test]
async fn test_create_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/user_story/records"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"title\""))
        .and(body_string_contains("Checkout flow"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "s1", "title": "Checkout flow"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, true).await;
    let payload = FormPayload::new()
        .text("title", "Checkout flow")
        .number("story_points", 3);
    let record = client.create("user_story", payload).await.unwrap();
    assert_eq!(record["id"], "s1");
}

#[tokio::test]
async fn test_update_uses_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/collections/test_case/records/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "t1", "name": "Renamed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, true).await;
    let record = client
        .update("test_case", "t1", FormPayload::new().text("name", "Renamed"))
        .await
        .unwrap();
    assert_eq!(record["name"], "Renamed");
}

#[tokio::test]
async fn test_record_id_is_a_single_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/project/records/a%2F..%2Fusers%3Fx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a/../users?x"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, true).await;
    let record = client.get_one("project", "a/../users?x").await.unwrap();
    assert_eq!(record["id"], "a/../users?x");
}

#[tokio::test]
async fn test_get_one_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/collections/project/records/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "message": "The requested resource wasn't found.",
            "data": {}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, true).await;
    let err = client.get_one("project", "missing").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/collections/project/records/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, true).await;
    client.delete("project", "p1").await.unwrap();
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/users/auth-refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "message": "The request requires valid record authorization token.",
            "data": {}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, true).await;
    let err = client.refresh_auth("users").await.unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_refresh_without_token_skips_network() {
    let server = MockServer::start().await;
    let client = client_for(&server, false).await;

    let err = client.refresh_auth("users").await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_password_reset_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/collections/users/request-password-reset"))
        .and(body_json(json!({"email": "ada@example.com"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/collections/users/confirm-password-reset"))
        .and(body_json(json!({
            "token": "reset-token",
            "password": "n3w-password",
            "passwordConfirm": "n3w-password"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, false).await;
    client
        .request_password_reset("users", "ada@example.com")
        .await
        .unwrap();
    client
        .confirm_password_reset("users", "reset-token", "n3w-password", "n3w-password")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = ClientConfig::with_urls("http://127.0.0.1:9", "http://127.0.0.1:9").unwrap();
    let client = HttpRecordClient::new(&config, Session::in_memory()).unwrap();

    let err = client
        .authenticate("users", "ada@example.com", "secret")
        .await
        .unwrap_err();
    assert!(err.is_network_error());
}
