// ABOUTME: Core types, entity tags, and utilities for Storyloom
// ABOUTME: Foundational package providing the record shapes shared by every Storyloom package

pub mod constants;
pub mod entity;
pub mod filter;
pub mod pagination;
pub mod types;
pub mod upload;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    ListResult, LoginRequest, PasswordRecovery, PasswordReset, Project, ProjectCreate,
    ProjectUpdate, RecordList, TestCase, TestCaseCreate, TestCaseUpdate, User, UserRegister,
    UserStory, UserStoryCreate, UserStoryUpdate, UserUpdateMe,
};

// Re-export entity tags
pub use entity::{EntityKind, QueryKind};

// Re-export constants
pub use constants::{
    ACCESS_TOKEN_KEY, PROJECT_COLLECTION, TEST_CASE_COLLECTION, USERS_COLLECTION,
    USER_STORY_COLLECTION,
};

// Re-export utilities
pub use filter::Filter;
pub use pagination::{page_number, skip_for_page, PageRequest, PaginationError};
pub use upload::{DocumentUpload, UploadError};
pub use utils::{format_date, truncate};
pub use validation::{FieldError, LocationSegment};
