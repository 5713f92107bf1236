// ABOUTME: Query cache synchronising service reads and writes
// ABOUTME: Coalesces identical reads, invalidates by entity kind and prefetches the next page

pub mod client;
pub mod error;
pub mod key;
pub mod mutations;
pub mod page;
pub mod queries;
pub mod query;

pub use client::QueryClient;
pub use error::{QueryError, QueryResult};
pub use key::{KeyParam, QueryKey};
pub use mutations::{Mutations, ProjectUpload};
pub use page::{PageLoader, PageState, PageView};
pub use queries::Queries;
pub use query::Query;

pub use tokio_util::sync::CancellationToken;
