// ABOUTME: Table and detail rendering for projects, user stories and test cases
// ABOUTME: Produces uncoloured comfy-table output so listings stay readable when piped

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use storyloom_core::{format_date, truncate, Project, TestCase, UserStory};
use storyloom_query::PageView;

const EMPTY: &str = "-";

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn or_empty(value: &str) -> String {
    if value.trim().is_empty() {
        EMPTY.to_string()
    } else {
        value.to_string()
    }
}

/// Stored file name of the uploaded document
fn document_name(project: &Project) -> String {
    match project.brd_document.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => EMPTY.to_string(),
    }
}

pub fn projects_table(projects: &[Project]) -> Table {
    let mut table = table(vec!["ID", "Document", "Created", "Updated"]);
    for project in projects {
        table.add_row(vec![
            project.id.clone(),
            truncate(&document_name(project), 40),
            format_date(&project.created),
            format_date(&project.updated),
        ]);
    }
    table
}

pub fn user_stories_table(stories: &[UserStory]) -> Table {
    let mut table = table(vec!["ID", "Title", "Priority", "Points", "Status", "Created"]);
    for story in stories {
        table.add_row(vec![
            story.id.clone(),
            truncate(&story.title, 40),
            or_empty(&story.priority),
            story.story_points.to_string(),
            or_empty(&story.status),
            format_date(&story.created),
        ]);
    }
    table
}

pub fn test_cases_table(cases: &[TestCase]) -> Table {
    let mut table = table(vec!["ID", "Name", "Expected Result", "Created"]);
    for case in cases {
        table.add_row(vec![
            case.id.clone(),
            truncate(&case.name, 40),
            truncate(&or_empty(&case.expected_result), 40),
            format_date(&case.created),
        ]);
    }
    table
}

/// "Page 2 of 4 (17 total)" plus the navigation that is currently possible
pub fn page_footer<T>(view: &PageView<T>) -> String {
    let mut footer = match view.data.total_pages {
        Some(pages) if pages > 0 => format!("Page {} of {}", view.page, pages),
        _ => format!("Page {}", view.page),
    };
    footer.push_str(&format!(" ({} total)", view.data.total));

    let mut hints = Vec::new();
    if view.has_previous_page {
        hints.push(format!("--page {} for previous", view.page - 1));
    }
    if view.has_next_page {
        hints.push(format!("--page {} for next", view.page + 1));
    }
    if !hints.is_empty() {
        footer.push_str(" | ");
        footer.push_str(&hints.join(", "));
    }
    footer
}

/// Label/value pairs for `projects show`
pub fn project_details(project: &Project) -> Vec<(&'static str, String)> {
    vec![
        ("ID", project.id.clone()),
        ("Document", document_name(project)),
        ("Owner", project.user.clone()),
        ("Created", format_date(&project.created)),
        ("Updated", format_date(&project.updated)),
    ]
}

/// Label/value pairs for `stories show`
pub fn user_story_details(story: &UserStory) -> Vec<(&'static str, String)> {
    vec![
        ("ID", story.id.clone()),
        ("Title", story.title.clone()),
        ("Description", or_empty(&story.description)),
        ("Acceptance Criteria", or_empty(&story.acceptance_criteria)),
        ("Priority", or_empty(&story.priority)),
        ("Story Points", story.story_points.to_string()),
        ("Status", or_empty(&story.status)),
        ("Project", story.project.clone()),
        ("Created", format_date(&story.created)),
    ]
}

pub fn test_case_details(case: &TestCase) -> Vec<(&'static str, String)> {
    vec![
        ("ID", case.id.clone()),
        ("Name", case.name.clone()),
        ("Description", or_empty(&case.description)),
        ("Preconditions", or_empty(&case.preconditions)),
        ("Steps", or_empty(&case.steps)),
        ("Expected Result", or_empty(&case.expected_result)),
        ("User Story", case.user_story.clone()),
        ("Created", format_date(&case.created)),
    ]
}
