//! Persistence adapters for the key-value store port.

mod file_store;

pub use file_store::FileKeyValueStore;
