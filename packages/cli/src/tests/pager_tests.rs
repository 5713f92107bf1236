use crate::app::App;
use crate::pager::{navigation, preview, Navigation};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;
use storyloom_client::{InMemoryBackend, Session};
use storyloom_core::{DocumentUpload, ListResult, LoginRequest, ProjectCreate, QueryKind};
use storyloom_query::PageView;
use storyloom_services::{ServiceContext, Services};

fn view(page: u32, has_next_page: bool) -> PageView<u32> {
    PageView {
        page,
        data: Arc::new(ListResult {
            data: vec![1, 2],
            total: 2,
            total_pages: Some(1),
        }),
        is_placeholder: false,
        has_next_page,
        has_previous_page: page > 1,
    }
}

async fn signed_in_app() -> App {
    let session = Session::in_memory();
    let backend = InMemoryBackend::new(session.clone());
    backend.add_user("ada@example.com", "secret123", Some("Ada"));
    let services = Services::new(ServiceContext::new(
        Arc::new(backend.clone()),
        Arc::new(backend),
        session,
    ));
    let app = App::new(services, 5);
    app.mutations
        .login(LoginRequest {
            email: "ada@example.com".to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap();
    app
}

#[rstest]
#[case::first_of_many(1, true, vec![Navigation::Next, Navigation::Quit])]
#[case::middle(2, true, vec![Navigation::Next, Navigation::Previous, Navigation::Quit])]
#[case::last(3, false, vec![Navigation::Previous, Navigation::Quit])]
#[case::only(1, false, vec![])]
fn test_navigation_offers_valid_moves(
    #[case] page: u32,
    #[case] has_next: bool,
    #[case] expected: Vec<Navigation>,
) {
    assert_eq!(navigation(&view(page, has_next)), expected);
}

#[test]
fn test_navigation_targets() {
    assert_eq!(Navigation::Next.target(2), Some(3));
    assert_eq!(Navigation::Previous.target(2), Some(1));
    assert_eq!(Navigation::Previous.target(1), Some(1));
    assert_eq!(Navigation::Quit.target(2), None);
}

#[tokio::test]
async fn test_preview_before_first_load_is_empty() {
    let app = signed_in_app().await;
    let loader = app.queries.project_pages(&app.client);
    assert!(preview(&loader, 1).is_none());
}

#[tokio::test]
async fn test_preview_shows_previous_page_while_next_loads() {
    let app = signed_in_app().await;
    let document = DocumentUpload::new("brd.pdf", b"%PDF-1.4".to_vec()).unwrap();
    app.mutations
        .upload_project(
            ProjectCreate {
                brd_document: Some(document),
            },
            None,
        )
        .await
        .unwrap();

    let loader = app.queries.project_pages(&app.client);
    let first = loader.load(1).await.unwrap();
    assert_eq!(first.data.len(), 1);

    // Page 1 is cached and fresh: nothing to preview
    assert!(preview(&loader, 1).is_none());

    let placeholder = preview(&loader, 2).unwrap();
    assert_eq!(placeholder.page, 2);
    assert!(placeholder.is_placeholder);
    assert!(!placeholder.has_next_page);
    assert_eq!(placeholder.data.len(), 1);

    // Stale data for the key itself is preferred after invalidation
    app.client.invalidate(QueryKind::Projects);
    let stale = preview(&loader, 1).unwrap();
    assert!(stale.is_placeholder);
    assert_eq!(stale.data.data[0].id, first.data.data[0].id);
}
