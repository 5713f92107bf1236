use crate::render::{page_footer, projects_table, user_stories_table, user_story_details};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use storyloom_core::{ListResult, Project, UserStory};
use storyloom_query::PageView;

fn story(id: &str, title: &str) -> UserStory {
    UserStory {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        acceptance_criteria: "Given a user".to_string(),
        priority: "High".to_string(),
        story_points: 5,
        status: "To Do".to_string(),
        user: "u1".to_string(),
        project: "p1".to_string(),
        created: "2024-05-01 10:00:00.000Z".to_string(),
        updated: "2024-05-01 10:00:00.000Z".to_string(),
    }
}

fn view(page: u32, total: u64, total_pages: Option<u64>, has_next: bool) -> PageView<UserStory> {
    PageView {
        page,
        data: Arc::new(ListResult {
            data: vec![story("us1", "Login")],
            total,
            total_pages,
        }),
        is_placeholder: false,
        has_next_page: has_next,
        has_previous_page: page > 1,
    }
}

#[test]
fn test_footer_first_page_with_more() {
    assert_eq!(
        page_footer(&view(1, 12, Some(3), true)),
        "Page 1 of 3 (12 total) | --page 2 for next"
    );
}

#[test]
fn test_footer_middle_page() {
    assert_eq!(
        page_footer(&view(2, 12, Some(3), true)),
        "Page 2 of 3 (12 total) | --page 1 for previous, --page 3 for next"
    );
}

#[test]
fn test_footer_placeholder_offers_no_next_page() {
    let mut placeholder = view(3, 12, Some(3), false);
    placeholder.is_placeholder = true;
    assert_eq!(
        page_footer(&placeholder),
        "Page 3 of 3 (12 total) | --page 2 for previous"
    );
}

#[test]
fn test_footer_without_page_count() {
    assert_eq!(page_footer(&view(1, 1, None, false)), "Page 1 (1 total)");
}

#[test]
fn test_user_stories_table_formats_rows() {
    let rendered = user_stories_table(&[story("us1", "Login with email")]).to_string();
    assert!(rendered.contains("Login with email"));
    assert!(rendered.contains("2024-05-01"));
    assert!(rendered.contains("High"));
}

#[test]
fn test_projects_table_shows_placeholder_for_missing_document() {
    let project = Project {
        id: "p1".to_string(),
        user: "u1".to_string(),
        brd_document: None,
        created: "2024-05-01 10:00:00.000Z".to_string(),
        updated: String::new(),
    };
    let rendered = projects_table(&[project]).to_string();
    assert!(rendered.contains("p1"));
    assert!(rendered.contains(" - "));
}

#[test]
fn test_story_details_fill_empty_fields() {
    let details = user_story_details(&story("us1", "Login"));
    assert_eq!(details[2], ("Description", "-".to_string()));
    assert_eq!(details[5], ("Story Points", "5".to_string()));
    assert_eq!(details[8], ("Created", "2024-05-01".to_string()));
}
