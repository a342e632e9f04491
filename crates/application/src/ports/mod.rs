//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session layer and the outside
//! world. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod http_client;
mod key_value_store;
mod navigator;

pub use http_client::{HttpClient, HttpClientError};
pub use key_value_store::{KeyValueStore, StorageError};
pub use navigator::Navigator;
