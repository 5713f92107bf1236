//! Service behaviour against the in-memory backend

use pretty_assertions::assert_eq;
use std::sync::Arc;
use storyloom_client::{ClientError, InMemoryBackend, MemoryTokenStore, Session, TokenStore};
use storyloom_core::{
    DocumentUpload, LoginRequest, PageRequest, PasswordReset, ProjectCreate, ProjectUpdate,
    UserRegister, UserStoryCreate, UserStoryUpdate, UserUpdateMe, PROJECT_COLLECTION,
};
use storyloom_services::{ServiceContext, ServiceError, Services};

fn document() -> DocumentUpload {
    DocumentUpload::new("requirements.pdf", b"%PDF-1.4 brd".to_vec()).unwrap()
}

fn services_for(session: Session, backend: &InMemoryBackend) -> Services {
    Services::new(ServiceContext::new(
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        session,
    ))
}

async fn login(services: &Services, email: &str) {
    services
        .auth
        .login(LoginRequest {
            email: email.to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap();
}

async fn signed_in() -> (Services, InMemoryBackend) {
    let session = Session::in_memory();
    let backend = InMemoryBackend::new(session.clone());
    backend.add_user("ada@example.com", "secret123", Some("Ada"));
    let services = services_for(session, &backend);
    login(&services, "ada@example.com").await;
    backend.reset_calls();
    (services, backend)
}

async fn new_project(services: &Services) -> String {
    services
        .projects
        .create(ProjectCreate {
            brd_document: Some(document()),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_login_populates_session() {
    let (services, _backend) = signed_in().await;
    let user = services.session().current_user().unwrap();
    assert_eq!(user.email, "ada@example.com");
    assert!(services.session().has_persisted_token());
}

#[tokio::test]
async fn test_login_failure_has_prefix() {
    let session = Session::in_memory();
    let backend = InMemoryBackend::new(session.clone());
    let services = services_for(session, &backend);

    let err = services
        .auth
        .login(LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "x".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Login failed: "));
    assert!(!services.session().is_authenticated());
}

#[tokio::test]
async fn test_register_rejects_mismatch_without_request() {
    let session = Session::in_memory();
    let backend = InMemoryBackend::new(session.clone());
    let services = services_for(session, &backend);

    let err = services
        .auth
        .register(UserRegister {
            email: "new@example.com".to_string(),
            password: "secret123".to_string(),
            password_confirm: "secret124".to_string(),
            name: None,
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.context(), "Registration failed");
    assert_eq!(backend.total_calls(), 0);
}

#[tokio::test]
async fn test_register_then_login() {
    let session = Session::in_memory();
    let backend = InMemoryBackend::new(session.clone());
    let services = services_for(session, &backend);

    let user = services
        .auth
        .register(UserRegister {
            email: "new@example.com".to_string(),
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            name: Some("New".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(user.name.as_deref(), Some("New"));
    assert!(!services.session().is_authenticated());

    login(&services, "new@example.com").await;
    assert!(services.session().is_authenticated());
}

#[tokio::test]
async fn test_list_requires_authentication() {
    let session = Session::in_memory();
    let backend = InMemoryBackend::new(session.clone());
    let services = services_for(session, &backend);

    let err = services
        .projects
        .list(PageRequest::new(0, 5))
        .await
        .unwrap_err();
    assert!(err.is_authentication());
    assert_eq!(err.context(), "Failed to fetch projects");
    assert_eq!(backend.total_calls(), 0);
}

#[tokio::test]
async fn test_zero_limit_is_validation_error() {
    let (services, backend) = signed_in().await;
    let err = services
        .projects
        .list(PageRequest::new(10, 0))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(backend.calls("list"), 0);
}

#[tokio::test]
async fn test_projects_are_scoped_to_owner() {
    let session = Session::in_memory();
    let backend = InMemoryBackend::new(session.clone());
    backend.add_user("ada@example.com", "secret123", None);
    backend.add_user("bob@example.com", "secret123", None);
    let services = services_for(session, &backend);

    login(&services, "ada@example.com").await;
    new_project(&services).await;
    new_project(&services).await;

    services.auth.logout().unwrap();
    login(&services, "bob@example.com").await;
    new_project(&services).await;

    let bobs = services.projects.list(PageRequest::new(0, 5)).await.unwrap();
    assert_eq!(bobs.total, 1);
    let bob_id = services.session().user_id().unwrap();
    assert!(bobs.data.iter().all(|project| project.user == bob_id));
}

#[tokio::test]
async fn test_project_create_injects_owner() {
    let (services, backend) = signed_in().await;
    let project = services
        .projects
        .create(ProjectCreate {
            brd_document: Some(document()),
        })
        .await
        .unwrap();

    assert_eq!(project.user, services.session().user_id().unwrap());
    assert_eq!(project.brd_document.as_deref(), Some("requirements.pdf"));
    assert_eq!(backend.count(PROJECT_COLLECTION), 1);
}

#[tokio::test]
async fn test_project_create_without_document_makes_no_request() {
    let (services, backend) = signed_in().await;
    let err = services
        .projects
        .create(ProjectCreate::default())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.details()[0].field(), "brd_document");
    assert_eq!(backend.calls("create"), 0);
}

#[tokio::test]
async fn test_project_create_rejects_unsupported_type() {
    let (services, backend) = signed_in().await;
    let upload = DocumentUpload {
        file_name: "notes.docx".to_string(),
        content_type: "application/octet-stream".to_string(),
        bytes: b"PK".to_vec().into(),
    };
    let err = services
        .projects
        .create(ProjectCreate {
            brd_document: Some(upload),
        })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(backend.calls("create"), 0);
}

#[tokio::test]
async fn test_project_update_skips_empty_owner() {
    let (services, _backend) = signed_in().await;
    let project_id = new_project(&services).await;
    let owner = services.session().user_id().unwrap();

    let project = services
        .projects
        .update(
            &project_id,
            ProjectUpdate {
                user: Some(String::new()),
                brd_document: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(project.user, owner);
}

#[tokio::test]
async fn test_user_story_update_omits_empty_fields() {
    let (services, _backend) = signed_in().await;
    let project_id = new_project(&services).await;
    let owner = services.session().user_id().unwrap();

    let story = services
        .user_stories
        .create(UserStoryCreate {
            title: "Checkout".to_string(),
            description: "Pay for the basket".to_string(),
            acceptance_criteria: "Payment succeeds".to_string(),
            priority: "high".to_string(),
            story_points: 5,
            status: "todo".to_string(),
            user: owner,
            project: project_id,
        })
        .await
        .unwrap();

    let updated = services
        .user_stories
        .update(
            &story.id,
            UserStoryUpdate {
                title: Some(String::new()),
                description: Some("Pay with a saved card".to_string()),
                story_points: Some(0),
                ..UserStoryUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Checkout");
    assert_eq!(updated.story_points, 0);

    // Read back from storage: omitted fields kept their stored values
    let stored = services.user_stories.get(&story.id).await.unwrap();
    assert_eq!(stored.title, "Checkout");
    assert_eq!(stored.description, "Pay with a saved card");
    assert_eq!(stored.acceptance_criteria, "Payment succeeds");
    assert_eq!(stored.priority, "high");
    assert_eq!(stored.status, "todo");
    assert_eq!(stored.story_points, 0);
}

#[tokio::test]
async fn test_stories_are_scoped_to_project() {
    let (services, _backend) = signed_in().await;
    let first = new_project(&services).await;
    let second = new_project(&services).await;
    services.user_stories.generate_user_stories(&first).await.unwrap();
    services.user_stories.generate_user_stories(&second).await.unwrap();

    let stories = services
        .user_stories
        .list(&first, PageRequest::new(0, 5))
        .await
        .unwrap();
    assert_eq!(stories.total, 3);
    assert!(stories.data.iter().all(|story| story.project == first));
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (services, _backend) = signed_in().await;
    let err = services.projects.get("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.context(), "Failed to fetch project");
}

#[tokio::test]
async fn test_generation_failure_has_prefix() {
    let (services, backend) = signed_in().await;
    let project_id = new_project(&services).await;
    backend.fail_next(
        "generate_user_stories",
        ClientError::Http {
            status: 502,
            message: "Bad Gateway".to_string(),
        },
    );

    let err = services
        .user_stories
        .generate_user_stories(&project_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Transport { .. }));
    assert!(err.to_string().starts_with("Failed to generate user stories: "));
    assert_eq!(backend.calls("generate_user_stories"), 1);
}

#[tokio::test]
async fn test_document_to_test_cases() {
    let (services, _backend) = signed_in().await;
    let project_id = new_project(&services).await;

    let stories = services
        .user_stories
        .generate_user_stories(&project_id)
        .await
        .unwrap();
    assert!(!stories.is_empty());

    let story = &stories.data[0];
    let cases = services
        .test_cases
        .generate_test_cases(&story.id)
        .await
        .unwrap();
    assert!(!cases.is_empty());
    assert!(cases.data.iter().all(|case| case.user_story == story.id));

    let listed = services
        .test_cases
        .list(&story.id, PageRequest::new(0, 5))
        .await
        .unwrap();
    assert_eq!(listed.total, cases.total);

    services.projects.delete(&project_id).await.unwrap();
    let err = services.user_stories.get(&story.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_current_user_recovers_identity_from_persisted_token() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = Session::new(store.clone());
    let backend = InMemoryBackend::new(session.clone());
    let user_id = backend.add_user("ada@example.com", "secret123", None);
    store.save(&backend.issue_token(&user_id)).unwrap();

    let services = services_for(session.clone(), &backend);
    assert!(session.has_persisted_token());
    assert!(session.current_user().is_none());

    let user = services.users.current_user().await.unwrap().unwrap();
    assert_eq!(user.id, user_id);
    assert_eq!(backend.calls("refresh_auth"), 1);
    assert!(session.current_user().is_some());
}

#[tokio::test]
async fn test_current_user_without_token_is_none() {
    let session = Session::in_memory();
    let backend = InMemoryBackend::new(session.clone());
    let services = services_for(session, &backend);

    assert!(services.users.current_user().await.unwrap().is_none());
    assert_eq!(backend.total_calls(), 0);
}

#[tokio::test]
async fn test_rejected_persisted_token_signs_out() {
    let store = Arc::new(MemoryTokenStore::with_token("revoked"));
    let session = Session::new(store.clone());
    let backend = InMemoryBackend::new(session.clone());
    let services = services_for(session.clone(), &backend);

    let err = services.users.current_user().await.unwrap_err();
    assert!(err.is_authentication());
    assert!(!session.has_persisted_token());
}

#[tokio::test]
async fn test_update_and_delete_current_user() {
    let (services, _backend) = signed_in().await;
    let user = services
        .users
        .update_current_user(UserUpdateMe {
            name: Some("Ada L.".to_string()),
            email: Some(String::new()),
        })
        .await
        .unwrap();
    assert_eq!(user.name.as_deref(), Some("Ada L."));
    assert_eq!(user.email, "ada@example.com");

    services.users.delete_current_user().await.unwrap();
    assert!(!services.session().is_authenticated());
    assert!(!services.session().has_persisted_token());
}

#[tokio::test]
async fn test_reset_password_checks_confirmation() {
    let (services, backend) = signed_in().await;
    let err = services
        .auth
        .reset_password(PasswordReset {
            token: "reset".to_string(),
            password: "a".to_string(),
            password_confirm: "b".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.context(), "Password reset failed");
    assert_eq!(backend.calls("confirm_password_reset"), 0);
}
