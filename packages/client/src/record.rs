// ABOUTME: Record backend abstraction used by the service facades
// ABOUTME: Collection-level CRUD, password auth and password reset operations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storyloom_core::{Filter, RecordList};

use crate::error::ClientResult;
use crate::form::FormPayload;

/// Token and account record returned by an auth call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthRecord {
    pub token: String,
    pub record: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub filter: Option<Filter>,
    pub sort: Option<String>,
}

impl ListOptions {
    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            sort: None,
        }
    }
}

/// Generic record store keyed by collection name.
///
/// Implementations attach the session token themselves.
#[async_trait]
pub trait RecordClient: Send + Sync {
    async fn authenticate(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> ClientResult<AuthRecord>;

    /// Exchange the current session token for a fresh one
    async fn refresh_auth(&self, collection: &str) -> ClientResult<AuthRecord>;

    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        options: &ListOptions,
    ) -> ClientResult<RecordList<Value>>;

    async fn get_one(&self, collection: &str, id: &str) -> ClientResult<Value>;

    async fn create(&self, collection: &str, payload: FormPayload) -> ClientResult<Value>;

    async fn update(&self, collection: &str, id: &str, payload: FormPayload)
        -> ClientResult<Value>;

    async fn delete(&self, collection: &str, id: &str) -> ClientResult<()>;

    async fn request_password_reset(&self, collection: &str, email: &str) -> ClientResult<()>;

    async fn confirm_password_reset(
        &self,
        collection: &str,
        token: &str,
        password: &str,
        password_confirm: &str,
    ) -> ClientResult<()>;
}
