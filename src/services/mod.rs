//! Clients for the hosted backing services.

pub mod storage;

pub use storage::StorageClient;
