// ABOUTME: Paginated views over cached list queries
// ABOUTME: Keeps the last displayed page as a placeholder and prefetches the next page when full

use std::sync::{Arc, Mutex, MutexGuard};
use storyloom_core::ListResult;

use crate::client::QueryClient;
use crate::error::QueryResult;
use crate::query::Query;

/// One displayed page of a list
#[derive(Debug)]
pub struct PageView<T> {
    pub page: u32,
    pub data: Arc<ListResult<T>>,
    /// Data belongs to another request and is shown while this page loads
    pub is_placeholder: bool,
    /// False while placeholder data is shown
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> Clone for PageView<T> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            data: Arc::clone(&self.data),
            is_placeholder: self.is_placeholder,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
        }
    }
}

impl<T> PageView<T> {
    fn settled(page: u32, data: Arc<ListResult<T>>, limit: u32) -> Self {
        let has_next_page = data.len() == limit as usize;
        Self {
            page,
            data,
            is_placeholder: false,
            has_next_page,
            has_previous_page: page > 1,
        }
    }

    fn as_placeholder(&self, page: u32) -> Self {
        Self {
            page,
            data: Arc::clone(&self.data),
            is_placeholder: true,
            has_next_page: false,
            has_previous_page: page > 1,
        }
    }
}

/// What a view can render for a page right now
#[derive(Debug)]
pub enum PageState<T> {
    Ready(PageView<T>),
    Placeholder(PageView<T>),
    Loading,
}

impl<T> PageState<T> {
    pub fn view(&self) -> Option<&PageView<T>> {
        match self {
            Self::Ready(view) | Self::Placeholder(view) => Some(view),
            Self::Loading => None,
        }
    }
}

type PageQueryFn<T> = dyn Fn(u32) -> Query<ListResult<T>> + Send + Sync;

/// Loads pages of one list (for example the projects of the session user)
pub struct PageLoader<T> {
    client: QueryClient,
    limit: u32,
    query_for: Arc<PageQueryFn<T>>,
    displayed: Arc<Mutex<Option<PageView<T>>>>,
}

impl<T> Clone for PageLoader<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            limit: self.limit,
            query_for: Arc::clone(&self.query_for),
            displayed: Arc::clone(&self.displayed),
        }
    }
}

impl<T: Send + Sync + 'static> PageLoader<T> {
    pub fn new<F>(client: QueryClient, limit: u32, query_for: F) -> Self
    where
        F: Fn(u32) -> Query<ListResult<T>> + Send + Sync + 'static,
    {
        Self {
            client,
            limit,
            query_for: Arc::new(query_for),
            displayed: Arc::new(Mutex::new(None)),
        }
    }

    fn displayed(&self) -> MutexGuard<'_, Option<PageView<T>>> {
        self.displayed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Fetch `page`, show it, and prefetch the following page when this one is full
    pub async fn load(&self, page: u32) -> QueryResult<PageView<T>> {
        let page = page.max(1);
        let data = self.client.fetch(&(self.query_for)(page)).await?;
        let view = PageView::settled(page, data, self.limit);

        if view.has_next_page {
            self.client.prefetch(&(self.query_for)(page + 1));
        }

        *self.displayed() = Some(view.clone());
        Ok(view)
    }

    /// Render state for `page` without fetching
    pub fn peek(&self, page: u32) -> PageState<T> {
        let page = page.max(1);
        let query = (self.query_for)(page);
        let cached = self.client.get_cached::<ListResult<T>>(query.key());

        if self.client.is_fresh(query.key()) {
            if let Some(data) = cached {
                return PageState::Ready(PageView::settled(page, data, self.limit));
            }
        }
        if let Some(data) = cached {
            let stale = PageView::settled(page, data, self.limit);
            return PageState::Placeholder(stale.as_placeholder(page));
        }
        match self.displayed().as_ref() {
            Some(previous) => PageState::Placeholder(previous.as_placeholder(page)),
            None => PageState::Loading,
        }
    }

    /// Last page handed out by `load`
    pub fn current(&self) -> Option<PageView<T>> {
        self.displayed().clone()
    }
}
