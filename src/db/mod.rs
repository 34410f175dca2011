//! SQLite snapshot files backing the stores, split across logical submodules.

mod accounts;
mod connection;
mod students;

pub use accounts::{fetch_accounts, replace_accounts};
pub use connection::{open_snapshot, SnapshotTable, ACCOUNTS_TABLE, STUDENTS_TABLE};
pub use students::{fetch_students, replace_students};
