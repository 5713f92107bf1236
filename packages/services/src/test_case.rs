// ABOUTME: Test case operations within one user story
// ABOUTME: CRUD plus generation of test cases from a story

use storyloom_client::FormPayload;
use storyloom_core::{
    Filter, ListResult, PageRequest, TestCase, TestCaseCreate, TestCaseUpdate,
    TEST_CASE_COLLECTION,
};
use tracing::info;

use crate::context::{decode, ServiceContext};
use crate::error::{Context, ServiceResult};

const LIST_FAILED: &str = "Failed to fetch test cases";
const GET_FAILED: &str = "Failed to fetch test case";
const CREATE_FAILED: &str = "Failed to create test case";
const UPDATE_FAILED: &str = "Failed to update test case";
const DELETE_FAILED: &str = "Failed to delete test case";
const GENERATE_FAILED: &str = "Failed to generate test cases";

#[derive(Clone)]
pub struct TestCaseService {
    ctx: ServiceContext,
}

impl TestCaseService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list(
        &self,
        user_story_id: &str,
        request: PageRequest,
    ) -> ServiceResult<ListResult<TestCase>> {
        self.ctx
            .list(
                LIST_FAILED,
                TEST_CASE_COLLECTION,
                Filter::eq("user_story", user_story_id),
                request,
            )
            .await
    }

    pub async fn get(&self, id: &str) -> ServiceResult<TestCase> {
        let record = self
            .ctx
            .records()
            .get_one(TEST_CASE_COLLECTION, id)
            .await
            .context(GET_FAILED)?;
        decode(GET_FAILED, record)
    }

    pub async fn create(&self, input: TestCaseCreate) -> ServiceResult<TestCase> {
        let payload = FormPayload::new()
            .text("name", input.name)
            .text("description", input.description)
            .text("preconditions", input.preconditions)
            .text("steps", input.steps)
            .text("expected_result", input.expected_result)
            .text("user_story", input.user_story);

        let record = self
            .ctx
            .records()
            .create(TEST_CASE_COLLECTION, payload)
            .await
            .context(CREATE_FAILED)?;
        decode(CREATE_FAILED, record)
    }

    pub async fn update(&self, id: &str, update: TestCaseUpdate) -> ServiceResult<TestCase> {
        let mut payload = FormPayload::new();
        payload.push_present("name", update.name.as_deref());
        payload.push_present("description", update.description.as_deref());
        payload.push_present("preconditions", update.preconditions.as_deref());
        payload.push_present("steps", update.steps.as_deref());
        payload.push_present("expected_result", update.expected_result.as_deref());
        payload.push_present("user_story", update.user_story.as_deref());

        let record = self
            .ctx
            .records()
            .update(TEST_CASE_COLLECTION, id, payload)
            .await
            .context(UPDATE_FAILED)?;
        decode(UPDATE_FAILED, record)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.ctx
            .records()
            .delete(TEST_CASE_COLLECTION, id)
            .await
            .context(DELETE_FAILED)
    }

    pub async fn generate_test_cases(
        &self,
        user_story_id: &str,
    ) -> ServiceResult<ListResult<TestCase>> {
        let generated = self
            .ctx
            .generation()
            .generate_test_cases(user_story_id)
            .await
            .context(GENERATE_FAILED)?;
        info!(
            "Generated {} test cases for user story {}",
            generated.items.len(),
            user_story_id
        );
        Ok(ListResult::from(generated))
    }
}
