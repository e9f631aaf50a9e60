//! Service layer for presence records.
//! - `users` holds the domain types, the repository seam and the CRUD service.
//! - `storage` holds the in-memory repository.
//! - Errors are plain `ServiceError` values; mapping to HTTP is the server's job.

pub mod errors;
pub mod storage;
pub mod users;
