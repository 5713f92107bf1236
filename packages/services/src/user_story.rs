// ABOUTME: User story operations within one project
// ABOUTME: CRUD plus generation of stories from the project's requirements document

use storyloom_client::FormPayload;
use storyloom_core::{
    Filter, ListResult, PageRequest, UserStory, UserStoryCreate, UserStoryUpdate,
    USER_STORY_COLLECTION,
};
use tracing::info;

use crate::context::{decode, ServiceContext};
use crate::error::{Context, ServiceResult};

const LIST_FAILED: &str = "Failed to fetch user stories";
const GET_FAILED: &str = "Failed to fetch user story";
const CREATE_FAILED: &str = "Failed to create user story";
const UPDATE_FAILED: &str = "Failed to update user story";
const DELETE_FAILED: &str = "Failed to delete user story";
const GENERATE_FAILED: &str = "Failed to generate user stories";

#[derive(Clone)]
pub struct UserStoryService {
    ctx: ServiceContext,
}

impl UserStoryService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list(
        &self,
        project_id: &str,
        request: PageRequest,
    ) -> ServiceResult<ListResult<UserStory>> {
        self.ctx
            .list(
                LIST_FAILED,
                USER_STORY_COLLECTION,
                Filter::eq("project", project_id),
                request,
            )
            .await
    }

    pub async fn get(&self, id: &str) -> ServiceResult<UserStory> {
        let record = self
            .ctx
            .records()
            .get_one(USER_STORY_COLLECTION, id)
            .await
            .context(GET_FAILED)?;
        decode(GET_FAILED, record)
    }

    pub async fn create(&self, input: UserStoryCreate) -> ServiceResult<UserStory> {
        let payload = FormPayload::new()
            .text("title", input.title)
            .text("description", input.description)
            .text("acceptance_criteria", input.acceptance_criteria)
            .text("priority", input.priority)
            .number("story_points", input.story_points)
            .text("status", input.status)
            .text("user", input.user)
            .text("project", input.project);

        let record = self
            .ctx
            .records()
            .create(USER_STORY_COLLECTION, payload)
            .await
            .context(CREATE_FAILED)?;
        decode(CREATE_FAILED, record)
    }

    /// Send only the fields that are set. `story_points` is sent even when 0.
    pub async fn update(&self, id: &str, update: UserStoryUpdate) -> ServiceResult<UserStory> {
        let mut payload = FormPayload::new();
        payload.push_present("title", update.title.as_deref());
        payload.push_present("description", update.description.as_deref());
        payload.push_present("acceptance_criteria", update.acceptance_criteria.as_deref());
        payload.push_present("priority", update.priority.as_deref());
        payload.push_number("story_points", update.story_points);
        payload.push_present("status", update.status.as_deref());
        payload.push_present("user", update.user.as_deref());
        payload.push_present("project", update.project.as_deref());

        let record = self
            .ctx
            .records()
            .update(USER_STORY_COLLECTION, id, payload)
            .await
            .context(UPDATE_FAILED)?;
        decode(UPDATE_FAILED, record)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.ctx
            .records()
            .delete(USER_STORY_COLLECTION, id)
            .await
            .context(DELETE_FAILED)
    }

    /// Ask the generation API for stories derived from the project's document
    pub async fn generate_user_stories(
        &self,
        project_id: &str,
    ) -> ServiceResult<ListResult<UserStory>> {
        let generated = self
            .ctx
            .generation()
            .generate_user_stories(project_id)
            .await
            .context(GENERATE_FAILED)?;
        info!(
            "Generated {} user stories for project {}",
            generated.items.len(),
            project_id
        );
        Ok(ListResult::from(generated))
    }
}
