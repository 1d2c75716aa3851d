//! Core record management for the campus backend.
//! This crate is the single source of truth for record and session invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;
pub mod store;

pub use api::{ApiResponse, CampusApi, SESSION_TOKEN_HEADER};
pub use config::{AdminCredentials, ConfigError, CoreConfig, StorageBackend};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::college::{College, StaffEntry};
pub use model::document::Document;
pub use model::id::RecordId;
pub use model::student::{Student, StudentProfile};
pub use service::auth_service::{
    AdminLoginRequest, AuthService, LoginOutcome, LoginRequest, RegisterRequest,
};
pub use service::college_service::CollegeService;
pub use service::password::{hash_password, verify_password};
pub use service::{ErrorKind, ServiceError, ServiceResult};
pub use session::{InMemorySessionStore, Session, SessionStore};
pub use store::{AnyStore, JsonFileStore, RecordStore, SqliteStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
