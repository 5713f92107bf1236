// ABOUTME: Project operations scoped to the signed-in owner
// ABOUTME: Projects are created from an uploaded requirements document

use storyloom_client::FormPayload;
use storyloom_core::upload::content_type_for;
use storyloom_core::{
    DocumentUpload, Filter, ListResult, PageRequest, Project, ProjectCreate, ProjectUpdate,
    PROJECT_COLLECTION,
};
use tracing::info;

use crate::context::{decode, ServiceContext};
use crate::error::{Context, ServiceError, ServiceResult};

const LIST_FAILED: &str = "Failed to fetch projects";
const GET_FAILED: &str = "Failed to fetch project";
const CREATE_FAILED: &str = "Failed to create project";
const UPDATE_FAILED: &str = "Failed to update project";
const DELETE_FAILED: &str = "Failed to delete project";

#[derive(Clone)]
pub struct ProjectService {
    ctx: ServiceContext,
}

fn check_document(context: &'static str, document: &DocumentUpload) -> ServiceResult<()> {
    content_type_for(&document.file_name).map_err(|e| ServiceError::from_upload(context, e))?;
    if document.is_empty() {
        return Err(ServiceError::invalid_field(
            context,
            "brd_document",
            "Document is empty",
        ));
    }
    Ok(())
}

impl ProjectService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Projects owned by the signed-in user
    pub async fn list(&self, request: PageRequest) -> ServiceResult<ListResult<Project>> {
        let user_id = self.ctx.require_user(LIST_FAILED)?;
        self.ctx
            .list(LIST_FAILED, PROJECT_COLLECTION, Filter::eq("user", &user_id), request)
            .await
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Project> {
        let record = self
            .ctx
            .records()
            .get_one(PROJECT_COLLECTION, id)
            .await
            .context(GET_FAILED)?;
        decode(GET_FAILED, record)
    }

    /// Create a project owned by the session user from a requirements document
    pub async fn create(&self, input: ProjectCreate) -> ServiceResult<Project> {
        let user_id = self.ctx.require_user(CREATE_FAILED)?;
        let document = input.brd_document.ok_or_else(|| {
            ServiceError::invalid_field(
                CREATE_FAILED,
                "brd_document",
                "A requirements document is required",
            )
        })?;
        check_document(CREATE_FAILED, &document)?;

        let file_name = document.file_name.clone();
        let payload = FormPayload::new()
            .text("user", user_id)
            .file("brd_document", document);
        let record = self
            .ctx
            .records()
            .create(PROJECT_COLLECTION, payload)
            .await
            .context(CREATE_FAILED)?;
        let project: Project = decode(CREATE_FAILED, record)?;
        info!("Created project {} from {}", project.id, file_name);
        Ok(project)
    }

    pub async fn update(&self, id: &str, update: ProjectUpdate) -> ServiceResult<Project> {
        if let Some(document) = &update.brd_document {
            check_document(UPDATE_FAILED, document)?;
        }

        let mut payload = FormPayload::new();
        payload.push_present("user", update.user.as_deref());
        payload.push_file("brd_document", update.brd_document);

        let record = self
            .ctx
            .records()
            .update(PROJECT_COLLECTION, id, payload)
            .await
            .context(UPDATE_FAILED)?;
        decode(UPDATE_FAILED, record)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.ctx
            .records()
            .delete(PROJECT_COLLECTION, id)
            .await
            .context(DELETE_FAILED)
    }
}
