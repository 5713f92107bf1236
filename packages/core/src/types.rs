// ABOUTME: Record and input shapes mirroring the backend collections
// ABOUTME: Users, projects, user stories, test cases and the list envelopes around them

use serde::{Deserialize, Serialize};

use crate::upload::DocumentUpload;

fn default_true() -> bool {
    true
}

/// Authenticated account record from the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub verified: bool,
}

impl User {
    /// Name to show in listings, falling back to the email address
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }
}

/// A project: one uploaded business requirements document owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user: String,
    #[serde(default)]
    pub brd_document: Option<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

/// A user story derived from (or written against) a project's document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub acceptance_criteria: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub story_points: u32,
    #[serde(default)]
    pub status: String,
    pub user: String,
    pub project: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

/// A test case belonging to one user story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preconditions: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub expected_result: String,
    pub user_story: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

/// Input for creating a project. The owner is always taken from the session.
#[derive(Debug, Clone, Default)]
pub struct ProjectCreate {
    pub brd_document: Option<DocumentUpload>,
}

/// Partial project update; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub user: Option<String>,
    pub brd_document: Option<DocumentUpload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStoryCreate {
    pub title: String,
    pub description: String,
    pub acceptance_criteria: String,
    pub priority: String,
    pub story_points: u32,
    pub status: String,
    pub user: String,
    pub project: String,
}

/// Partial user story update.
///
/// Text fields set to `Some("")` are treated like `None` and are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStoryUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub acceptance_criteria: Option<String>,
    pub priority: Option<String>,
    pub story_points: Option<u32>,
    pub status: Option<String>,
    pub user: Option<String>,
    pub project: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseCreate {
    pub name: String,
    pub description: String,
    pub preconditions: String,
    pub steps: String,
    pub expected_result: String,
    pub user_story: String,
}

/// Partial test case update; empty strings are not sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub preconditions: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub user_story: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdateMe {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordRecovery {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordReset {
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

/// List envelope returned by the record backend and the generation endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordList<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u64,
    pub items: Vec<T>,
}

impl<T> RecordList<T> {
    /// Convert the item type, keeping the paging metadata
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<RecordList<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(RecordList {
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            items,
        })
    }
}

/// Paginated view handed to callers of the service `list` operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub data: Vec<T>,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl<T> ListResult<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> From<RecordList<T>> for ListResult<T> {
    /// Envelopes without paging metadata (generation responses) describe one
    /// page holding every item.
    fn from(list: RecordList<T>) -> Self {
        if list.total_items == 0 && !list.items.is_empty() {
            return Self {
                total: list.items.len() as u64,
                total_pages: Some(1),
                data: list.items,
            };
        }
        Self {
            data: list.items,
            total: list.total_items,
            total_pages: Some(list.total_pages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_user_story_from_backend_record() {
        let record = json!({
            "id": "us1",
            "collectionId": "pbc_123",
            "collectionName": "user_story",
            "title": "Login",
            "description": "As a user I can log in",
            "acceptance_criteria": "Given ...",
            "priority": "High",
            "story_points": 3,
            "status": "To Do",
            "user": "u1",
            "project": "p1",
            "created": "2024-05-01 10:00:00.000Z",
            "updated": "2024-05-01 10:00:00.000Z"
        });

        let story: UserStory = serde_json::from_value(record).unwrap();
        assert_eq!(story.project, "p1");
        assert_eq!(story.story_points, 3);
        assert_eq!(story.priority, "High");
    }

    #[test]
    fn test_user_defaults() {
        let user: User = serde_json::from_value(json!({"id": "u1", "email": "a@b.c"})).unwrap();
        assert!(user.is_active);
        assert!(!user.is_superuser);
        assert_eq!(user.display_name(), "a@b.c");
    }

    #[test]
    fn test_record_list_tolerates_items_only_body() {
        let list: RecordList<serde_json::Value> =
            serde_json::from_value(json!({"items": [{"id": "x"}]})).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.total_items, 0);
    }

    #[test]
    fn test_list_result_from_items_only_envelope() {
        let list: RecordList<serde_json::Value> =
            serde_json::from_value(json!({"items": [{"id": "a"}, {"id": "b"}, {"id": "c"}]}))
                .unwrap();
        let result = ListResult::from(list);
        assert_eq!(result.len(), 3);
        assert_eq!(result.total, 3);
        assert_eq!(result.total_pages, Some(1));
    }

    #[test]
    fn test_list_result_from_record_list() {
        let list = RecordList {
            page: 2,
            per_page: 5,
            total_items: 12,
            total_pages: 3,
            items: vec!["a", "b"],
        };
        let result: ListResult<&str> = list.into();
        assert_eq!(
            result,
            ListResult {
                data: vec!["a", "b"],
                total: 12,
                total_pages: Some(3),
            }
        );
    }
}
