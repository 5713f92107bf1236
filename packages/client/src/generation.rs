// ABOUTME: Client for the story and test case generation endpoints
// ABOUTME: Single-shot POST requests with bearer auth and no request timeout

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use storyloom_core::{RecordList, TestCase, UserStory};
use tracing::{error, info};

use crate::config::{endpoint, ClientConfig};
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

const GENERATE_USER_STORIES_PATH: &str = "/api/v1/user_story/generate_from_pdf";
const GENERATE_TEST_CASES_PATH: &str = "/api/v1/test_case/generate_from_user_story";

/// Server-side generation of user stories and test cases
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Generate user stories from the project's requirements document
    async fn generate_user_stories(&self, project_id: &str) -> ClientResult<RecordList<UserStory>>;

    /// Generate test cases for one user story
    async fn generate_test_cases(&self, user_story_id: &str) -> ClientResult<RecordList<TestCase>>;
}

#[derive(Clone)]
pub struct GenerationClient {
    http_client: Client,
    base_url: String,
    session: Session,
}

impl GenerationClient {
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        // Generation can run for minutes; only connecting is bounded
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ClientError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.clone(),
            session,
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        param: (&str, &str),
    ) -> ClientResult<T> {
        let token = self
            .session
            .token()
            .ok_or_else(|| ClientError::unauthorized("Sign in before generating"))?;
        let url = endpoint(&self.base_url, path);

        info!("Requesting generation: {} {}={}", path, param.0, param.1);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .query(&[param])
            .send()
            .await
            .map_err(|e| {
                error!("Generation request failed: {}", e);
                ClientError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ClientError::from_response(status, &body);
            error!("Generation request returned {}: {}", status.as_u16(), err);
            return Err(err);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl GenerationApi for GenerationClient {
    async fn generate_user_stories(&self, project_id: &str) -> ClientResult<RecordList<UserStory>> {
        self.post(GENERATE_USER_STORIES_PATH, ("project_id", project_id))
            .await
    }

    async fn generate_test_cases(&self, user_story_id: &str) -> ClientResult<RecordList<TestCase>> {
        self.post(GENERATE_TEST_CASES_PATH, ("user_story_id", user_story_id))
            .await
    }
}
