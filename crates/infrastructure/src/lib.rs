//! Stratus Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod navigation;
pub mod persistence;
pub mod serialization;

pub use adapters::{DEFAULT_TIMEOUT, ReqwestHttpClient};
pub use config::{ClientConfig, ConfigError};
pub use navigation::HistoryNavigator;
pub use persistence::FileKeyValueStore;
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
