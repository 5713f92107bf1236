// ABOUTME: HTTP implementation of the record client
// ABOUTME: Talks to the collection REST API and maps status codes onto ClientError

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use storyloom_core::RecordList;
use tracing::{debug, error};
use url::Url;

use crate::config::{endpoint_url, ClientConfig};
use crate::error::{ClientError, ClientResult};
use crate::form::FormPayload;
use crate::record::{AuthRecord, ListOptions, RecordClient};
use crate::session::Session;

#[derive(Clone)]
pub struct HttpRecordClient {
    http_client: Client,
    base_url: String,
    session: Session,
}

impl HttpRecordClient {
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.record_url.clone(),
            session,
        })
    }

    fn collection_url(&self, collection: &str, action: &str) -> ClientResult<Url> {
        endpoint_url(&self.base_url, &["api", "collections", collection, action])
    }

    fn record_url(&self, collection: &str, id: &str) -> ClientResult<Url> {
        endpoint_url(
            &self.base_url,
            &["api", "collections", collection, "records", id],
        )
    }

    /// Attach the raw session token
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header("Authorization", token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = self.authorize(request).send().await.map_err(|e| {
            error!("Record request failed: {}", e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_response(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RecordClient for HttpRecordClient {
    async fn authenticate(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> ClientResult<AuthRecord> {
        let url = self.collection_url(collection, "auth-with-password")?;
        // Credentials go out without any stale token attached
        let response = self
            .http_client
            .post(url)
            .json(&json!({ "identity": identity, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response(status, &body));
        }
        response
            .json::<AuthRecord>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn refresh_auth(&self, collection: &str) -> ClientResult<AuthRecord> {
        if !self.session.is_authenticated() {
            return Err(ClientError::unauthorized("No session token to refresh"));
        }
        let url = self.collection_url(collection, "auth-refresh")?;
        self.send_json(self.http_client.post(url)).await
    }

    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        options: &ListOptions,
    ) -> ClientResult<RecordList<Value>> {
        let url = self.collection_url(collection, "records")?;
        let mut query = vec![
            ("page", page.to_string()),
            ("perPage", per_page.to_string()),
        ];
        if let Some(filter) = &options.filter {
            query.push(("filter", filter.to_string()));
        }
        if let Some(sort) = &options.sort {
            query.push(("sort", sort.clone()));
        }

        self.send_json(self.http_client.get(url).query(&query)).await
    }

    async fn get_one(&self, collection: &str, id: &str) -> ClientResult<Value> {
        let url = self.record_url(collection, id)?;
        self.send_json(self.http_client.get(url)).await
    }

    async fn create(&self, collection: &str, payload: FormPayload) -> ClientResult<Value> {
        let url = self.collection_url(collection, "records")?;
        let form = payload.into_multipart()?;
        self.send_json(self.http_client.post(url).multipart(form))
            .await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        payload: FormPayload,
    ) -> ClientResult<Value> {
        let url = self.record_url(collection, id)?;
        let form = payload.into_multipart()?;
        self.send_json(self.http_client.patch(url).multipart(form))
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> ClientResult<()> {
        let url = self.record_url(collection, id)?;
        self.send(self.http_client.delete(url)).await?;
        Ok(())
    }

    async fn request_password_reset(&self, collection: &str, email: &str) -> ClientResult<()> {
        let url = self.collection_url(collection, "request-password-reset")?;
        self.send(self.http_client.post(url).json(&json!({ "email": email })))
            .await?;
        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        collection: &str,
        token: &str,
        password: &str,
        password_confirm: &str,
    ) -> ClientResult<()> {
        let url = self.collection_url(collection, "confirm-password-reset")?;
        let body = json!({
            "token": token,
            "password": password,
            "passwordConfirm": password_confirm,
        });
        self.send(self.http_client.post(url).json(&body)).await?;
        Ok(())
    }
}
