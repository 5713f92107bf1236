// ABOUTME: A cacheable read: key plus a repeatable fetch
// ABOUTME: The fetch closure produces a fresh future for every attempt

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use storyloom_services::ServiceResult;

use crate::key::QueryKey;

type FetchFn<T> = dyn Fn() -> BoxFuture<'static, ServiceResult<T>> + Send + Sync;

pub struct Query<T> {
    key: QueryKey,
    fetch: Arc<FetchFn<T>>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            fetch: Arc::clone(&self.fetch),
        }
    }
}

impl<T: Send + 'static> Query<T> {
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ServiceResult<T>> + Send + 'static,
    {
        Self {
            key,
            fetch: Arc::new(move || fetch().boxed()),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub(crate) fn run(&self) -> BoxFuture<'static, ServiceResult<T>> {
        (self.fetch)()
    }
}

impl<T> std::fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query").field("key", &self.key).finish()
    }
}
