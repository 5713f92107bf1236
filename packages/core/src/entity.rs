// ABOUTME: Entity and query-kind tags used for dispatch and cache invalidation
// ABOUTME: Maps each deletable entity to its collection, label, cache tag and warning

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{PROJECT_COLLECTION, TEST_CASE_COLLECTION, USER_STORY_COLLECTION};

/// Entities that can be viewed and deleted from list screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    UserStory,
    TestCase,
}

impl EntityKind {
    /// Backend collection holding records of this kind
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Project => PROJECT_COLLECTION,
            Self::UserStory => USER_STORY_COLLECTION,
            Self::TestCase => TEST_CASE_COLLECTION,
        }
    }

    /// Human readable label used in menus and notices
    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::UserStory => "User Story",
            Self::TestCase => "Test Case",
        }
    }

    /// Cache tag whose entries go stale when a record of this kind changes
    pub fn query_kind(&self) -> QueryKind {
        match self {
            Self::Project => QueryKind::Projects,
            Self::UserStory => QueryKind::UserStories,
            Self::TestCase => QueryKind::TestCases,
        }
    }

    /// Kinds whose records the backend removes together with a record of this kind
    pub fn dependents(&self) -> &'static [EntityKind] {
        match self {
            Self::Project => &[EntityKind::UserStory, EntityKind::TestCase],
            Self::UserStory => &[EntityKind::TestCase],
            Self::TestCase => &[],
        }
    }

    pub fn delete_warning(&self) -> Option<&'static str> {
        match self {
            Self::Project => Some(
                "All items associated with this project will also be permanently deleted.",
            ),
            Self::UserStory => Some(
                "All test cases associated with this user story will also be permanently deleted.",
            ),
            Self::TestCase => None,
        }
    }

    pub fn all() -> [EntityKind; 3] {
        [Self::Project, Self::UserStory, Self::TestCase]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Entity tag of a cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryKind {
    CurrentUser,
    Users,
    Projects,
    UserStories,
    TestCases,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentUser => "currentUser",
            Self::Users => "users",
            Self::Projects => "projects",
            Self::UserStories => "userStories",
            Self::TestCases => "testCases",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
