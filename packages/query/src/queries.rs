// ABOUTME: Query definitions for every read the application performs
// ABOUTME: Binds cache keys to service calls and builds page loaders for the lists

use storyloom_core::{ListResult, PageRequest, Project, TestCase, User, UserStory};
use storyloom_services::Services;

use crate::client::QueryClient;
use crate::key::QueryKey;
use crate::page::PageLoader;
use crate::query::Query;

#[derive(Clone)]
pub struct Queries {
    services: Services,
    page_size: u32,
}

impl Queries {
    pub fn new(services: Services, page_size: u32) -> Self {
        Self {
            services,
            page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Signed-in identity. `None` without a session or persisted token.
    pub fn current_user(&self) -> Query<Option<User>> {
        let users = self.services.users.clone();
        Query::new(QueryKey::current_user(), move || {
            let users = users.clone();
            async move { users.current_user().await }
        })
    }

    pub fn projects(&self, page: u32) -> Query<ListResult<Project>> {
        let projects = self.services.projects.clone();
        let request = PageRequest::for_page(page, self.page_size);
        Query::new(QueryKey::projects(page), move || {
            let projects = projects.clone();
            async move { projects.list(request).await }
        })
    }

    pub fn project(&self, id: &str) -> Query<Project> {
        let projects = self.services.projects.clone();
        let id = id.to_string();
        Query::new(QueryKey::project(&id), move || {
            let projects = projects.clone();
            let id = id.clone();
            async move { projects.get(&id).await }
        })
    }

    pub fn user_stories(&self, project_id: &str, page: u32) -> Query<ListResult<UserStory>> {
        let stories = self.services.user_stories.clone();
        let project_id = project_id.to_string();
        let request = PageRequest::for_page(page, self.page_size);
        Query::new(QueryKey::user_stories(&project_id, page), move || {
            let stories = stories.clone();
            let project_id = project_id.clone();
            async move { stories.list(&project_id, request).await }
        })
    }

    pub fn user_story(&self, id: &str) -> Query<UserStory> {
        let stories = self.services.user_stories.clone();
        let id = id.to_string();
        Query::new(QueryKey::user_story(&id), move || {
            let stories = stories.clone();
            let id = id.clone();
            async move { stories.get(&id).await }
        })
    }

    pub fn test_cases(&self, user_story_id: &str, page: u32) -> Query<ListResult<TestCase>> {
        let cases = self.services.test_cases.clone();
        let user_story_id = user_story_id.to_string();
        let request = PageRequest::for_page(page, self.page_size);
        Query::new(QueryKey::test_cases(&user_story_id, page), move || {
            let cases = cases.clone();
            let user_story_id = user_story_id.clone();
            async move { cases.list(&user_story_id, request).await }
        })
    }

    pub fn test_case(&self, id: &str) -> Query<TestCase> {
        let cases = self.services.test_cases.clone();
        let id = id.to_string();
        Query::new(QueryKey::test_case(&id), move || {
            let cases = cases.clone();
            let id = id.clone();
            async move { cases.get(&id).await }
        })
    }

    pub fn project_pages(&self, client: &QueryClient) -> PageLoader<Project> {
        let queries = self.clone();
        PageLoader::new(client.clone(), self.page_size, move |page| queries.projects(page))
    }

    pub fn user_story_pages(
        &self,
        client: &QueryClient,
        project_id: &str,
    ) -> PageLoader<UserStory> {
        let queries = self.clone();
        let project_id = project_id.to_string();
        PageLoader::new(client.clone(), self.page_size, move |page| {
            queries.user_stories(&project_id, page)
        })
    }

    pub fn test_case_pages(
        &self,
        client: &QueryClient,
        user_story_id: &str,
    ) -> PageLoader<TestCase> {
        let queries = self.clone();
        let user_story_id = user_story_id.to_string();
        PageLoader::new(client.clone(), self.page_size, move |page| {
            queries.test_cases(&user_story_id, page)
        })
    }
}
