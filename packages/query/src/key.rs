// ABOUTME: Cache keys: an entity kind tag plus identifying parameters
// ABOUTME: Invalidation matches on the kind only

use std::fmt;
use storyloom_core::QueryKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyParam {
    Id(String),
    ProjectId(String),
    UserStoryId(String),
    Page(u32),
}

impl fmt::Display for KeyParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={}", id),
            Self::ProjectId(id) => write!(f, "projectId={}", id),
            Self::UserStoryId(id) => write!(f, "userStoryId={}", id),
            Self::Page(page) => write!(f, "page={}", page),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub kind: QueryKind,
    pub params: Vec<KeyParam>,
}

impl QueryKey {
    pub fn new(kind: QueryKind, params: Vec<KeyParam>) -> Self {
        Self { kind, params }
    }

    pub fn current_user() -> Self {
        Self::new(QueryKind::CurrentUser, Vec::new())
    }

    pub fn projects(page: u32) -> Self {
        Self::new(QueryKind::Projects, vec![KeyParam::Page(page)])
    }

    pub fn project(id: &str) -> Self {
        Self::new(QueryKind::Projects, vec![KeyParam::Id(id.to_string())])
    }

    pub fn user_stories(project_id: &str, page: u32) -> Self {
        Self::new(
            QueryKind::UserStories,
            vec![
                KeyParam::ProjectId(project_id.to_string()),
                KeyParam::Page(page),
            ],
        )
    }

    pub fn user_story(id: &str) -> Self {
        Self::new(QueryKind::UserStories, vec![KeyParam::Id(id.to_string())])
    }

    pub fn test_cases(user_story_id: &str, page: u32) -> Self {
        Self::new(
            QueryKind::TestCases,
            vec![
                KeyParam::UserStoryId(user_story_id.to_string()),
                KeyParam::Page(page),
            ],
        )
    }

    pub fn test_case(id: &str) -> Self {
        Self::new(QueryKind::TestCases, vec![KeyParam::Id(id.to_string())])
    }

    pub fn page(&self) -> Option<u32> {
        self.params.iter().find_map(|param| match param {
            KeyParam::Page(page) => Some(*page),
            _ => None,
        })
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.kind)?;
        for param in &self.params {
            write!(f, ", {}", param)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_differ_by_params() {
        assert_ne!(QueryKey::projects(1), QueryKey::projects(2));
        assert_ne!(QueryKey::projects(1), QueryKey::project("1"));
        assert_eq!(QueryKey::user_stories("p1", 2), QueryKey::user_stories("p1", 2));
        assert_eq!(QueryKey::user_story("s1").kind, QueryKind::UserStories);
    }

    #[test]
    fn test_display_and_page() {
        let key = QueryKey::user_stories("p1", 3);
        assert_eq!(key.to_string(), "[userStories, projectId=p1, page=3]");
        assert_eq!(key.page(), Some(3));
        assert_eq!(QueryKey::current_user().page(), None);
    }
}
