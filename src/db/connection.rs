use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode};
use tracing::warn;

/// A snapshot table: how to create it and the exact column layout the
/// fetch/replace helpers expect to find.
pub struct SnapshotTable {
    name: &'static str,
    create: &'static str,
    columns: &'static [&'static str],
}

/// Student records. `position` carries the collection order so a reload
/// hands records back exactly as they were saved.
pub const STUDENTS_TABLE: SnapshotTable = SnapshotTable {
    name: "students",
    create: "CREATE TABLE IF NOT EXISTS students (
        position INTEGER PRIMARY KEY,
        id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        course TEXT NOT NULL,
        year INTEGER NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL
    )",
    columns: &["position", "id", "name", "course", "year", "email", "phone"],
};

/// Login accounts.
pub const ACCOUNTS_TABLE: SnapshotTable = SnapshotTable {
    name: "accounts",
    create: "CREATE TABLE IF NOT EXISTS accounts (
        position INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL
    )",
    columns: &["position", "username", "password", "role"],
};

/// Suffix appended to a snapshot file that cannot be used as-is.
const QUARANTINE_SUFFIX: &str = ".corrupt";

/// Open (or create) a snapshot file and make sure its table exists with the
/// expected layout.
///
/// A file that is not a readable SQLite database, or whose table has some
/// other column layout, is renamed to `<file>.corrupt` and a fresh snapshot
/// is created in its place. Either case behaves like a first run and the
/// next save succeeds.
pub fn open_snapshot(path: &Path, table: &SnapshotTable) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let conn = match open_with_table(path, table) {
        Ok(conn) => conn,
        Err(err) if is_unreadable(&err) => {
            return start_fresh(path, table, "snapshot is not a readable database");
        }
        Err(err) => return Err(err),
    };

    let columns = table_columns(&conn, table.name)?;
    if columns != table.columns {
        warn!(
            table = table.name,
            found = ?columns,
            "snapshot table has an unexpected layout"
        );
        drop(conn);
        return start_fresh(path, table, "snapshot table layout does not match");
    }

    Ok(conn)
}

fn open_with_table(path: &Path, table: &SnapshotTable) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open snapshot {}", path.display()))?;
    conn.execute_batch(table.create)
        .context("failed to create snapshot table")?;
    Ok(conn)
}

/// Column names of `table` in declaration order.
fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
        .context("failed to prepare table layout query")?;

    let columns = stmt
        .query_map([table], |row| row.get(0))
        .context("failed to read table layout")?
        .collect::<Result<Vec<String>, _>>()
        .context("failed to collect table layout")?;

    Ok(columns)
}

fn start_fresh(path: &Path, table: &SnapshotTable, reason: &str) -> Result<Connection> {
    let aside = quarantine(path)?;
    warn!(
        path = %path.display(),
        moved_to = %aside.display(),
        "{reason}, starting empty"
    );
    open_with_table(path, table)
}

/// True when SQLite rejected the file itself rather than a statement.
fn is_unreadable(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<rusqlite::Error>())
        .any(|cause| {
            matches!(
                cause.sqlite_error_code(),
                Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt)
            )
        })
}

/// Move an unusable snapshot out of the way, replacing any earlier
/// quarantined copy.
fn quarantine(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(QUARANTINE_SUFFIX);
    let aside = path.with_file_name(name);
    fs::rename(path, &aside)
        .with_context(|| format!("failed to move aside unreadable {}", path.display()))?;
    Ok(aside)
}
