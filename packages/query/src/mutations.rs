// ABOUTME: Writes that keep the query cache consistent
// ABOUTME: Each successful mutation invalidates its entity kind; failures and cancellations touch nothing

use std::future::Future;
use storyloom_core::{
    EntityKind, ListResult, LoginRequest, Project, ProjectCreate, ProjectUpdate, QueryKind,
    TestCase, TestCaseCreate, TestCaseUpdate, User, UserRegister, UserStory, UserStoryCreate,
    UserStoryUpdate, UserUpdateMe,
};
use storyloom_services::{ServiceResult, Services};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::QueryClient;
use crate::error::{QueryError, QueryResult};
use crate::key::QueryKey;

/// Outcome of uploading a document: the new project and its generated stories
#[derive(Debug, Clone)]
pub struct ProjectUpload {
    pub project: Project,
    pub user_stories: ListResult<UserStory>,
}

/// Run `operation` unless `cancel` fires first
async fn cancellable<T>(
    cancel: Option<&CancellationToken>,
    operation: impl Future<Output = ServiceResult<T>>,
) -> QueryResult<T> {
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(QueryError::Cancelled),
                result = operation => result.map_err(QueryError::from),
            }
        }
        None => operation.await.map_err(QueryError::from),
    }
}

#[derive(Clone)]
pub struct Mutations {
    services: Services,
    client: QueryClient,
}

impl Mutations {
    pub fn new(services: Services, client: QueryClient) -> Self {
        Self { services, client }
    }

    fn invalidate(&self, kinds: &[QueryKind]) {
        for kind in kinds {
            self.client.invalidate(*kind);
        }
    }

    pub async fn login(&self, request: LoginRequest) -> QueryResult<User> {
        let user = self.services.auth.login(request).await?;
        // Nothing cached for a previous identity may survive
        self.client.clear();
        self.client
            .set_data(QueryKey::current_user(), Some(user.clone()));
        Ok(user)
    }

    pub fn logout(&self) -> QueryResult<()> {
        let result = self.services.auth.logout();
        // Memory is cleared even if the stored token could not be removed
        self.client.clear();
        result.map_err(QueryError::from)
    }

    pub async fn register(&self, request: UserRegister) -> QueryResult<User> {
        let user = self.services.auth.register(request).await?;
        self.invalidate(&[QueryKind::Users]);
        Ok(user)
    }

    pub async fn update_current_user(&self, update: UserUpdateMe) -> QueryResult<User> {
        let user = self.services.users.update_current_user(update).await?;
        self.invalidate(&[QueryKind::CurrentUser, QueryKind::Users]);
        Ok(user)
    }

    pub async fn delete_account(&self) -> QueryResult<()> {
        self.services.users.delete_current_user().await?;
        self.client.clear();
        Ok(())
    }

    /// Create a project from a document, then generate its user stories.
    ///
    /// The project list is invalidated as soon as the project exists, even if
    /// generation later fails or is cancelled.
    pub async fn upload_project(
        &self,
        input: ProjectCreate,
        cancel: Option<&CancellationToken>,
    ) -> QueryResult<ProjectUpload> {
        let project = cancellable(cancel, self.services.projects.create(input)).await?;
        self.invalidate(&[QueryKind::Projects]);
        info!("Uploaded project {}, generating user stories", project.id);

        let user_stories = self.generate_user_stories(&project.id, cancel).await?;
        Ok(ProjectUpload {
            project,
            user_stories,
        })
    }

    pub async fn update_project(&self, id: &str, update: ProjectUpdate) -> QueryResult<Project> {
        let project = self.services.projects.update(id, update).await?;
        self.invalidate(&[QueryKind::Projects]);
        Ok(project)
    }

    pub async fn create_user_story(&self, input: UserStoryCreate) -> QueryResult<UserStory> {
        let story = self.services.user_stories.create(input).await?;
        self.invalidate(&[QueryKind::UserStories]);
        Ok(story)
    }

    pub async fn update_user_story(
        &self,
        id: &str,
        update: UserStoryUpdate,
    ) -> QueryResult<UserStory> {
        let story = self.services.user_stories.update(id, update).await?;
        self.invalidate(&[QueryKind::UserStories]);
        Ok(story)
    }

    pub async fn create_test_case(&self, input: TestCaseCreate) -> QueryResult<TestCase> {
        let case = self.services.test_cases.create(input).await?;
        self.invalidate(&[QueryKind::TestCases]);
        Ok(case)
    }

    pub async fn update_test_case(
        &self,
        id: &str,
        update: TestCaseUpdate,
    ) -> QueryResult<TestCase> {
        let case = self.services.test_cases.update(id, update).await?;
        self.invalidate(&[QueryKind::TestCases]);
        Ok(case)
    }

    /// Delete any entity, invalidating its kind and every kind that cascades from it
    pub async fn delete(&self, kind: EntityKind, id: &str) -> QueryResult<()> {
        match kind {
            EntityKind::Project => self.services.projects.delete(id).await?,
            EntityKind::UserStory => self.services.user_stories.delete(id).await?,
            EntityKind::TestCase => self.services.test_cases.delete(id).await?,
        }
        debug!("Deleted {} {}", kind, id);

        self.client.invalidate(kind.query_kind());
        for dependent in kind.dependents() {
            self.client.invalidate(dependent.query_kind());
        }
        Ok(())
    }

    pub async fn generate_user_stories(
        &self,
        project_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> QueryResult<ListResult<UserStory>> {
        let stories = cancellable(
            cancel,
            self.services.user_stories.generate_user_stories(project_id),
        )
        .await?;
        self.invalidate(&[QueryKind::UserStories]);
        Ok(stories)
    }

    pub async fn generate_test_cases(
        &self,
        user_story_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> QueryResult<ListResult<TestCase>> {
        let cases = cancellable(
            cancel,
            self.services.test_cases.generate_test_cases(user_story_id),
        )
        .await?;
        self.invalidate(&[QueryKind::TestCases]);
        Ok(cases)
    }
}
