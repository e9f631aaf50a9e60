//! User presence records: domain types, storage seam and the CRUD service.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{LineStatus, NewUser, User, UserId, UserInput, UserPatch};
pub use repository::UserRepository;
pub use service::UserService;
