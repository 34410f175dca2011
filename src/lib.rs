//! Core library for the student records system: the persisted record and
//! credential stores plus the search and report engines built on top of them.
//!
//! Presentation code (the bundled CLI, or any other front end) only calls the
//! operations re-exported here and shows their results.
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;
pub mod query;
pub mod report;
pub mod store;

pub use auth::{CredentialStore, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
pub use config::AppConfig;
pub use error::{ErrorKind, StoreError, StoreResult};
pub use forms::{parse_year, SearchForm, StudentForm};
pub use models::{StudentRecord, UserAccount};
pub use query::{QueryEngine, SearchCriteria};
pub use report::{ReportEngine, Statistics};
pub use store::{RecordStore, SqliteRecordStore};
