//! Plain-text reports generated fresh from the record store on every call.

use std::collections::BTreeMap;

use crate::models::StudentRecord;
use crate::query::QueryEngine;
use crate::store::RecordStore;

const REPORT_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 40;

/// Record count plus per-course and per-year groupings. Keys are kept sorted
/// so the rendered report is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub by_course: BTreeMap<String, usize>,
    pub by_year: BTreeMap<u32, usize>,
}

impl Statistics {
    pub fn from_students(students: &[StudentRecord]) -> Self {
        let mut stats = Statistics {
            total: students.len(),
            ..Statistics::default()
        };
        for student in students {
            *stats.by_course.entry(student.course.clone()).or_insert(0) += 1;
            *stats.by_year.entry(student.year).or_insert(0) += 1;
        }
        stats
    }
}

/// Columns a tabular report can show. Course and year reports drop the column
/// they filter on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Course,
    Year,
    Email,
    Phone,
}

impl Column {
    fn title(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Name => "Name",
            Column::Course => "Course",
            Column::Year => "Year",
            Column::Email => "Email",
            Column::Phone => "Phone",
        }
    }

    fn width(self) -> usize {
        match self {
            Column::Id => 10,
            Column::Name => 25,
            Column::Course => 20,
            Column::Year => 5,
            Column::Email => 25,
            Column::Phone => 15,
        }
    }

    fn value(self, student: &StudentRecord) -> String {
        match self {
            Column::Id => student.id.clone(),
            Column::Name => student.name.clone(),
            Column::Course => student.course.clone(),
            Column::Year => student.year.to_string(),
            Column::Email => student.email.clone(),
            Column::Phone => student.phone.clone(),
        }
    }
}

const ALL_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Name,
    Column::Course,
    Column::Year,
    Column::Email,
    Column::Phone,
];
const COURSE_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Name,
    Column::Year,
    Column::Email,
    Column::Phone,
];
const YEAR_COLUMNS: &[Column] = &[
    Column::Id,
    Column::Name,
    Column::Course,
    Column::Email,
    Column::Phone,
];

pub struct ReportEngine<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> ReportEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn all_students_report(&self) -> String {
        let students = self.store.all();
        render_table(
            "ALL STUDENTS REPORT",
            ALL_COLUMNS,
            &students,
            "No students found.",
        )
    }

    /// Records whose course contains `course`, ignoring case.
    pub fn course_report(&self, course: &str) -> String {
        let students = QueryEngine::new(self.store).by_course(course);
        render_table(
            &format!("STUDENTS BY COURSE: {}", course.to_uppercase()),
            COURSE_COLUMNS,
            &students,
            &format!("No students found for course: {course}"),
        )
    }

    pub fn year_report(&self, year: u32) -> String {
        let students = QueryEngine::new(self.store).by_year(year);
        render_table(
            &format!("STUDENTS BY YEAR: {year}"),
            YEAR_COLUMNS,
            &students,
            &format!("No students found for year: {year}"),
        )
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_students(&self.store.all())
    }

    pub fn statistics_report(&self) -> String {
        let stats = self.statistics();
        let mut report = String::new();

        push_rule(&mut report, '=', REPORT_WIDTH);
        report.push_str("STATISTICS REPORT\n");
        push_rule(&mut report, '=', REPORT_WIDTH);
        report.push_str(&format!("Total Students: {}\n", stats.total));
        report.push('\n');

        report.push_str("Students by Course:\n");
        push_rule(&mut report, '-', SECTION_WIDTH);
        for (course, count) in &stats.by_course {
            report.push_str(&format!("{course:<30}: {count}\n"));
        }

        report.push_str("\nStudents by Year:\n");
        push_rule(&mut report, '-', SECTION_WIDTH);
        for (year, count) in &stats.by_year {
            report.push_str(&format!("{:<30}: {count}\n", format!("Year {year}")));
        }

        push_rule(&mut report, '=', REPORT_WIDTH);
        report
    }
}

fn render_table(
    title: &str,
    columns: &[Column],
    students: &[StudentRecord],
    empty_message: &str,
) -> String {
    let mut report = String::new();

    push_rule(&mut report, '=', REPORT_WIDTH);
    report.push_str(title);
    report.push('\n');
    push_rule(&mut report, '=', REPORT_WIDTH);

    let header: Vec<String> = columns.iter().map(|c| c.title().to_string()).collect();
    push_row(&mut report, columns, &header);
    push_rule(&mut report, '-', REPORT_WIDTH);

    if students.is_empty() {
        report.push_str(empty_message);
        report.push('\n');
    } else {
        for student in students {
            let cells: Vec<String> = columns.iter().map(|c| c.value(student)).collect();
            push_row(&mut report, columns, &cells);
        }
    }

    push_rule(&mut report, '=', REPORT_WIDTH);
    report.push_str(&format!("Total Students: {}\n", students.len()));
    report
}

fn push_row(report: &mut String, columns: &[Column], cells: &[String]) {
    let line = columns
        .iter()
        .zip(cells)
        .map(|(column, cell)| format!("{cell:<width$}", width = column.width()))
        .collect::<Vec<_>>()
        .join(" ");
    report.push_str(line.trim_end());
    report.push('\n');
}

fn push_rule(report: &mut String, ch: char, width: usize) {
    report.extend(std::iter::repeat(ch).take(width));
    report.push('\n');
}
