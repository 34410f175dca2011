//! The student record store: an in-memory collection kept in lockstep with a
//! SQLite snapshot file.
//!
//! Every mutation rewrites the full snapshot rather than a diff. The
//! collection is small, and a whole-snapshot write means the file on disk is
//! always a complete collection. Mutations run in the order
//! copy -> modify -> persist -> swap cache, so a failed write leaves the
//! in-memory collection exactly as it was.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::db::{fetch_students, open_snapshot, replace_students, STUDENTS_TABLE};
use crate::error::{StoreError, StoreResult};
use crate::models::StudentRecord;

/// Name used for the student collection in logs and persistence errors.
const COLLECTION: &str = "students";

/// Data-access contract for student records. The query and report engines
/// only ever talk to this trait.
pub trait RecordStore: Send + Sync {
    /// Re-read the persisted snapshot, replace the in-memory collection with
    /// it and return it. A missing or unreadable snapshot yields an empty
    /// collection.
    fn load_all(&self) -> Vec<StudentRecord>;

    /// Replace the whole collection. Rejects collections with duplicate ids.
    fn save_all(&self, students: Vec<StudentRecord>) -> StoreResult<()>;

    /// Append a record whose id is not yet present.
    fn add(&self, student: StudentRecord) -> StoreResult<()>;

    /// Replace the record with the same id, keeping its position.
    fn update(&self, student: StudentRecord) -> StoreResult<()>;

    /// Remove the record with this id and hand it back.
    fn delete(&self, id: &str) -> StoreResult<StudentRecord>;

    /// Exact id lookup.
    fn find_by_id(&self, id: &str) -> Option<StudentRecord>;

    /// Owned copy of the current collection in insertion order.
    fn all(&self) -> Vec<StudentRecord>;
}

/// [`RecordStore`] backed by a SQLite snapshot file.
///
/// The connection mutex is the single mutation boundary: writers hold it from
/// the moment they copy the collection until the new cache is in place.
/// Readers only touch the `RwLock`ed cache, which is swapped after the
/// snapshot has committed, so they never see a half-applied change.
pub struct SqliteRecordStore {
    path: PathBuf,
    conn: Mutex<Connection>,
    students: RwLock<Vec<StudentRecord>>,
}

impl SqliteRecordStore {
    /// Open the snapshot at `path`, creating it if needed, and load its
    /// contents. Only a failure to create the file at all is reported.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_snapshot(&path, &STUDENTS_TABLE)?;
        let students = load_or_empty(&conn, &path);
        info!(path = %path.display(), count = students.len(), "student store opened");

        Ok(Self {
            path,
            conn: Mutex::new(conn),
            students: RwLock::new(students),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `mutate` against a copy of the collection, persist the copy and
    /// only then publish it as the new cache.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<StudentRecord>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = lock(&self.conn);
        let mut next = read(&self.students).clone();
        let outcome = mutate(&mut next)?;

        if let Err(err) = replace_students(&mut conn, &next) {
            error!(
                path = %self.path.display(),
                error = %format!("{err:#}"),
                "student snapshot write failed"
            );
            return Err(StoreError::persistence(COLLECTION, err));
        }

        *write(&self.students) = next;
        Ok(outcome)
    }
}

impl RecordStore for SqliteRecordStore {
    fn load_all(&self) -> Vec<StudentRecord> {
        let conn = lock(&self.conn);
        let students = load_or_empty(&conn, &self.path);
        *write(&self.students) = students.clone();
        students
    }

    fn save_all(&self, students: Vec<StudentRecord>) -> StoreResult<()> {
        if let Some(id) = first_duplicate_id(&students) {
            return Err(StoreError::DuplicateStudent(id.to_string()));
        }
        let count = students.len();
        self.commit(|current| {
            *current = students;
            Ok(())
        })?;
        info!(count, "student snapshot saved");
        Ok(())
    }

    fn add(&self, student: StudentRecord) -> StoreResult<()> {
        let id = student.id.clone();
        self.commit(|current| {
            if current.iter().any(|existing| existing.id == student.id) {
                return Err(StoreError::DuplicateStudent(student.id));
            }
            current.push(student);
            Ok(())
        })?;
        info!(id = %id, "student added");
        Ok(())
    }

    fn update(&self, student: StudentRecord) -> StoreResult<()> {
        let id = student.id.clone();
        self.commit(|current| {
            let slot = current
                .iter_mut()
                .find(|existing| existing.id == student.id)
                .ok_or_else(|| StoreError::StudentNotFound(student.id.clone()))?;
            *slot = student;
            Ok(())
        })?;
        info!(id = %id, "student updated");
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<StudentRecord> {
        let removed = self.commit(|current| {
            let index = current
                .iter()
                .position(|existing| existing.id == id)
                .ok_or_else(|| StoreError::StudentNotFound(id.to_string()))?;
            Ok(current.remove(index))
        })?;
        info!(id = %id, "student deleted");
        Ok(removed)
    }

    fn find_by_id(&self, id: &str) -> Option<StudentRecord> {
        read(&self.students)
            .iter()
            .find(|student| student.id == id)
            .cloned()
    }

    fn all(&self) -> Vec<StudentRecord> {
        read(&self.students).clone()
    }
}

fn load_or_empty(conn: &Connection, path: &Path) -> Vec<StudentRecord> {
    match fetch_students(conn) {
        Ok(students) => students,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "student snapshot unreadable, starting empty"
            );
            Vec::new()
        }
    }
}

fn first_duplicate_id(students: &[StudentRecord]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(students.len());
    students
        .iter()
        .map(|student| student.id.as_str())
        .find(|id| !seen.insert(*id))
}

// A panic while a guard was held cannot leave the collection half-written
// (the cache is only ever replaced wholesale), so poisoned locks are reused.

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
