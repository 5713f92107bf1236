/// Collection holding user accounts
pub const USERS_COLLECTION: &str = "users";

/// Collection holding projects (one uploaded BRD each)
pub const PROJECT_COLLECTION: &str = "project";

/// Collection holding user stories
pub const USER_STORY_COLLECTION: &str = "user_story";

/// Collection holding test cases
pub const TEST_CASE_COLLECTION: &str = "test_case";

/// Storage key under which the bearer token is persisted
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// File extensions accepted for uploaded requirement documents
pub const ACCEPTED_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];
