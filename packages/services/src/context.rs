// ABOUTME: Shared dependencies injected into every service
// ABOUTME: Record client, generation API and session, plus the list and decode helpers they share

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use storyloom_client::{
    ClientConfig, ClientResult, GenerationApi, GenerationClient, HttpRecordClient, ListOptions,
    RecordClient, Session,
};
use storyloom_core::{Filter, ListResult, PageRequest};
use tracing::debug;

use crate::error::{Context, ServiceError, ServiceResult};
use crate::{AuthService, ProjectService, TestCaseService, UserService, UserStoryService};

#[derive(Clone)]
pub struct ServiceContext {
    records: Arc<dyn RecordClient>,
    generation: Arc<dyn GenerationApi>,
    session: Session,
}

impl ServiceContext {
    pub fn new(
        records: Arc<dyn RecordClient>,
        generation: Arc<dyn GenerationApi>,
        session: Session,
    ) -> Self {
        Self {
            records,
            generation,
            session,
        }
    }

    pub fn records(&self) -> &dyn RecordClient {
        self.records.as_ref()
    }

    pub fn generation(&self) -> &dyn GenerationApi {
        self.generation.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Id of the signed-in user
    pub(crate) fn require_user(&self, context: &'static str) -> ServiceResult<String> {
        self.session
            .user_id()
            .ok_or_else(|| ServiceError::authentication(context, "User is not authenticated."))
    }

    /// Fetch one page of a collection restricted to `filter`
    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        context: &'static str,
        collection: &str,
        filter: Filter,
        request: PageRequest,
    ) -> ServiceResult<ListResult<T>> {
        self.require_user(context)?;
        let page = request
            .page()
            .map_err(|e| ServiceError::from_pagination(context, e))?;
        if !request.is_aligned() {
            debug!(
                "Offset {} is not a multiple of {}; serving page {}",
                request.skip, request.limit, page
            );
        }

        let options = ListOptions::filtered(filter);
        let list = self
            .records
            .list(collection, page, request.limit, &options)
            .await
            .context(context)?;
        let list = list.try_map(|value| decode::<T>(context, value))?;
        Ok(ListResult::from(list))
    }
}

/// Decode a backend record, reporting shape mismatches as transport failures
pub(crate) fn decode<T: DeserializeOwned>(context: &'static str, value: Value) -> ServiceResult<T> {
    serde_json::from_value(value).map_err(|e| ServiceError::Transport {
        context,
        source: storyloom_client::ClientError::InvalidResponse(e.to_string()),
    })
}

/// Every service wired to one context
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub projects: ProjectService,
    pub user_stories: UserStoryService,
    pub test_cases: TestCaseService,
    context: ServiceContext,
}

impl Services {
    pub fn new(context: ServiceContext) -> Self {
        Self {
            auth: AuthService::new(context.clone()),
            users: UserService::new(context.clone()),
            projects: ProjectService::new(context.clone()),
            user_stories: UserStoryService::new(context.clone()),
            test_cases: TestCaseService::new(context.clone()),
            context,
        }
    }

    /// Services over the HTTP clients
    pub fn connect(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let records = HttpRecordClient::new(config, session.clone())?;
        let generation = GenerationClient::new(config, session.clone())?;
        Ok(Self::new(ServiceContext::new(
            Arc::new(records),
            Arc::new(generation),
            session,
        )))
    }

    pub fn session(&self) -> &Session {
        self.context.session()
    }
}
