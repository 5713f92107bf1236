//! HTTP contract tests for the generation client

use serde_json::json;
use storyloom_client::{ClientConfig, ClientError, GenerationApi, GenerationClient, Session};
use storyloom_core::User;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signed_in_session() -> Session {
    let session = Session::in_memory();
    let user = User {
        id: "u1".to_string(),
        email: "ada@example.com".to_string(),
        name: None,
        is_active: true,
        is_superuser: false,
        verified: true,
    };
    session.sign_in("jwt-token", user).unwrap();
    session
}

fn client_for(server: &MockServer, session: Session) -> GenerationClient {
    let config = ClientConfig::with_urls(&server.uri(), &server.uri()).unwrap();
    GenerationClient::new(&config, session).unwrap()
}

#[tokio::test]
async fn test_generate_user_stories() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user_story/generate_from_pdf"))
        .and(query_param("project_id", "p1"))
        .and(header("Authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "s1",
                "title": "Upload a document",
                "description": "As a PM I upload a BRD",
                "acceptance_criteria": "The file is stored",
                "priority": "high",
                "story_points": 3,
                "status": "todo",
                "user": "u1",
                "project": "p1",
                "created": "2024-01-01 00:00:00.000Z",
                "updated": "2024-01-01 00:00:00.000Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_session());
    let stories = client.generate_user_stories("p1").await.unwrap();
    assert_eq!(stories.items.len(), 1);
    assert_eq!(stories.items[0].project, "p1");
    assert_eq!(stories.items[0].story_points, 3);
}

#[tokio::test]
async fn test_generate_test_cases() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/test_case/generate_from_user_story"))
        .and(query_param("user_story_id", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1, "perPage": 1, "totalItems": 1, "totalPages": 1,
            "items": [{
                "id": "t1",
                "name": "Upload succeeds",
                "description": "",
                "preconditions": "",
                "steps": "Upload",
                "expected_result": "Stored",
                "user_story": "s1",
                "created": "2024-01-01 00:00:00.000Z",
                "updated": "2024-01-01 00:00:00.000Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_session());
    let cases = client.generate_test_cases("s1").await.unwrap();
    assert_eq!(cases.items[0].user_story, "s1");
}

#[tokio::test]
async fn test_unprocessable_entity_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user_story/generate_from_pdf"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["query", "project_id"], "msg": "field required", "type": "value_error.missing"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_session());
    match client.generate_user_stories("").await.unwrap_err() {
        ClientError::Validation { details, .. } => {
            assert_eq!(details.len(), 1);
            assert_eq!(details[0].field(), "project_id");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_not_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/test_case/generate_from_user_story"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model backend unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_session());
    let err = client.generate_test_cases("s1").await.unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_requires_session_token() {
    let server = MockServer::start().await;
    let client = client_for(&server, Session::in_memory());

    let err = client.generate_user_stories("p1").await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}
