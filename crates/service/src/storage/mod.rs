//! Storage implementations for the service layer.
//!
//! Records live only for the lifetime of the process.

pub mod memory_store;

pub use memory_store::InMemoryUserStore;
