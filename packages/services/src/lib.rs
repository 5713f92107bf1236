// ABOUTME: Typed service facades for accounts, projects, user stories and test cases
// ABOUTME: Translates record client failures into ServiceError with a stable context prefix

pub mod auth;
pub mod context;
pub mod error;
pub mod project;
pub mod test_case;
pub mod user;
pub mod user_story;

pub use auth::AuthService;
pub use context::{ServiceContext, Services};
pub use error::{ServiceError, ServiceResult};
pub use project::ProjectService;
pub use test_case::TestCaseService;
pub use user::UserService;
pub use user_story::UserStoryService;
