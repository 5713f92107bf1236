// ABOUTME: Clients for the Storyloom record backend and the generation API
// ABOUTME: Holds the session context and token persistence shared by both clients

pub mod config;
pub mod error;
pub mod form;
pub mod generation;
pub mod http;
pub mod record;
pub mod session;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use form::{FormPayload, FormValue};
pub use generation::{GenerationApi, GenerationClient};
pub use http::HttpRecordClient;
pub use record::{AuthRecord, ListOptions, RecordClient};
pub use session::Session;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryBackend;
