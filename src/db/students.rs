use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::StudentRecord;

/// Read the whole student snapshot in saved order.
pub fn fetch_students(conn: &Connection) -> Result<Vec<StudentRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, course, year, email, phone
             FROM students
             ORDER BY position",
        )
        .context("failed to prepare student query")?;

    let students = stmt
        .query_map([], |row| {
            Ok(StudentRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                course: row.get(2)?,
                year: row.get(3)?,
                email: row.get(4)?,
                phone: row.get(5)?,
            })
        })
        .context("failed to load students")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect students")?;

    Ok(students)
}

/// Overwrite the student snapshot with `students`. Runs in one transaction,
/// so either the whole new collection lands or the old one stays.
pub fn replace_students(conn: &mut Connection, students: &[StudentRecord]) -> Result<()> {
    let tx = conn
        .transaction()
        .context("failed to begin student snapshot")?;

    tx.execute("DELETE FROM students", [])
        .context("failed to clear student snapshot")?;

    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO students (position, id, name, course, year, email, phone)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .context("failed to prepare student insert")?;

        for (position, student) in students.iter().enumerate() {
            stmt.execute(params![
                position as i64,
                student.id,
                student.name,
                student.course,
                student.year,
                student.email,
                student.phone,
            ])
            .with_context(|| format!("failed to write student {}", student.id))?;
        }
    }

    tx.commit().context("failed to commit student snapshot")?;
    Ok(())
}
