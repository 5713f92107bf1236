// ABOUTME: Application context shared by every command
// ABOUTME: Builds the session, services, query cache and mutations from configuration

use anyhow::Result;
use std::sync::Arc;
use storyloom_client::{ClientConfig, FileTokenStore, Session};
use storyloom_core::User;
use storyloom_query::{Mutations, Queries, QueryClient};
use storyloom_services::{ServiceError, Services};
use tracing::debug;

const NOT_SIGNED_IN: &str = "Not signed in";

pub struct App {
    pub services: Services,
    pub client: QueryClient,
    pub queries: Queries,
    pub mutations: Mutations,
}

impl App {
    pub fn new(services: Services, page_size: u32) -> Self {
        let client = QueryClient::new();
        Self {
            queries: Queries::new(services.clone(), page_size),
            mutations: Mutations::new(services.clone(), client.clone()),
            services,
            client,
        }
    }

    /// Wire the HTTP clients and the persisted token file
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let store = FileTokenStore::resolve(config.auth_file.as_deref())?;
        debug!("Using token file {}", store.path().display());
        let session = Session::new(Arc::new(store));
        let services = Services::connect(config, session)?;
        Ok(Self::new(services, config.page_size))
    }

    pub fn session(&self) -> &Session {
        self.services.session()
    }

    /// The signed-in user, restoring a persisted token when needed
    pub async fn require_user(&self) -> Result<User> {
        let session = self.session();
        if !session.is_authenticated() && !session.has_persisted_token() {
            return Err(
                ServiceError::authentication(NOT_SIGNED_IN, "Run `storyloom login` first").into(),
            );
        }

        let user = self.client.fetch(&self.queries.current_user()).await?;
        match user.as_ref() {
            Some(user) => Ok(user.clone()),
            None => Err(ServiceError::authentication(
                NOT_SIGNED_IN,
                "No saved session was found",
            )
            .into()),
        }
    }
}
