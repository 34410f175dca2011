//! Query and report engines over a populated store.

use student_records::{
    QueryEngine, RecordStore, ReportEngine, SearchCriteria, SqliteRecordStore, StudentRecord,
};
use tempfile::TempDir;

fn populated(dir: &TempDir) -> SqliteRecordStore {
    let store = SqliteRecordStore::open(dir.path().join("students.sqlite")).expect("open");
    let students = vec![
        StudentRecord::new("1", "Ann", "CS", 2, "ann@uni.edu", "555-0001"),
        StudentRecord::new("2", "Ann", "EE", 2, "ann2@uni.edu", "555-0002"),
        StudentRecord::new("13", "Bob Stone", "Applied CS", 3, "bob@uni.edu", "555-0003"),
        StudentRecord::new("4", "Cleo", "History", 1, "cleo@uni.edu", "555-0004"),
    ];
    store.save_all(students).expect("seed");
    store
}

fn ids(students: &[StudentRecord]) -> Vec<&str> {
    students.iter().map(|s| s.id.as_str()).collect()
}

mod search {
    use super::*;

    #[test]
    fn empty_criteria_return_everything_in_order() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);
        let query = QueryEngine::new(&store);

        let results = query.search(&SearchCriteria::default());
        assert_eq!(ids(&results), vec!["1", "2", "13", "4"]);

        let blank = SearchCriteria {
            id: Some(String::new()),
            name: Some(String::new()),
            course: Some(String::new()),
            year: None,
        };
        assert_eq!(ids(&query.search(&blank)), vec!["1", "2", "13", "4"]);
    }

    #[test]
    fn criteria_compose_with_and() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);

        let criteria = SearchCriteria::new().name("ann").course("cs");
        let results = QueryEngine::new(&store).search(&criteria);

        assert_eq!(ids(&results), vec!["1"]);
    }

    #[test]
    fn id_criterion_is_a_substring_but_by_id_is_exact() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);
        let query = QueryEngine::new(&store);

        assert_eq!(ids(&query.search(&SearchCriteria::new().id("1"))), vec!["1", "13"]);
        assert_eq!(ids(&query.by_id("1")), vec!["1"]);
        assert!(query.by_id("99").is_empty());
    }

    #[test]
    fn per_field_searches() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);
        let query = QueryEngine::new(&store);

        assert_eq!(ids(&query.by_name("STONE")), vec!["13"]);
        assert_eq!(ids(&query.by_course("cs")), vec!["1", "13"]);
        assert_eq!(ids(&query.by_year(2)), vec!["1", "2"]);
        assert!(query.by_year(7).is_empty());
    }

    #[test]
    fn search_sees_latest_mutation() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);
        let query = QueryEngine::new(&store);
        assert_eq!(query.by_year(3).len(), 1);

        store.delete("13").expect("delete");
        assert!(query.by_year(3).is_empty());
    }
}

mod reports {
    use super::*;

    #[test]
    fn all_students_report_lists_rows_and_total() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);

        let report = ReportEngine::new(&store).all_students_report();

        assert!(report.contains("ALL STUDENTS REPORT"));
        assert!(report.contains("cleo@uni.edu"));
        assert!(report.ends_with("Total Students: 4\n"));
    }

    #[test]
    fn all_students_report_on_empty_store() {
        let dir = TempDir::new().expect("tempdir");
        let store = SqliteRecordStore::open(dir.path().join("students.sqlite")).expect("open");

        let report = ReportEngine::new(&store).all_students_report();

        assert!(report.contains("No students found.\n"));
        assert!(report.ends_with("Total Students: 0\n"));
    }

    #[test]
    fn course_report_filters_by_substring() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);
        let reports = ReportEngine::new(&store);

        let report = reports.course_report("cs");
        assert!(report.contains("STUDENTS BY COURSE: CS"));
        assert!(report.contains("Bob Stone"));
        assert!(!report.contains("Cleo"));
        assert!(report.ends_with("Total Students: 2\n"));

        let none = reports.course_report("Biology");
        assert!(none.contains("No students found for course: Biology"));
        assert!(none.ends_with("Total Students: 0\n"));
    }

    #[test]
    fn year_report_filters_exactly() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);
        let reports = ReportEngine::new(&store);

        let report = reports.year_report(1);
        assert!(report.contains("STUDENTS BY YEAR: 1"));
        assert!(report.contains("Cleo"));
        assert!(report.ends_with("Total Students: 1\n"));

        assert!(reports
            .year_report(9)
            .contains("No students found for year: 9"));
    }

    #[test]
    fn statistics_group_courses_and_years() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);
        let reports = ReportEngine::new(&store);

        let stats = reports.statistics();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_course.len(), 4);
        assert_eq!(stats.by_year.get(&2), Some(&2));
        assert_eq!(stats.by_year.len(), 3);

        let report = reports.statistics_report();
        assert!(report.contains("Total Students: 4"));
        let year_two: Vec<&str> = report
            .lines()
            .filter(|line| line.starts_with("Year 2 "))
            .collect();
        assert_eq!(year_two.len(), 1);
        assert!(year_two[0].ends_with(": 2"));
    }

    #[test]
    fn statistics_lines_are_padded_and_terminated() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);

        let report = ReportEngine::new(&store).statistics_report();
        let lines: Vec<&str> = report.lines().collect();

        assert!(lines.contains(&"Total Students: 4"));
        assert!(lines.contains(&format!("{:<30}: 1", "Applied CS").as_str()));
        assert!(lines.contains(&format!("{:<30}: 1", "Year 3").as_str()));
        assert!(report.contains("Total Students: 4\n\nStudents by Course:\n"));
        assert!(report.ends_with(&format!(": 1\n{}\n", "=".repeat(80))));
    }

    #[test]
    fn statistics_on_empty_store_have_no_groups() {
        let dir = TempDir::new().expect("tempdir");
        let store = SqliteRecordStore::open(dir.path().join("students.sqlite")).expect("open");
        let reports = ReportEngine::new(&store);

        let stats = reports.statistics();
        assert_eq!(stats.total, 0);
        assert!(stats.by_course.is_empty());
        assert!(stats.by_year.is_empty());

        let report = reports.statistics_report();
        assert!(report.contains("Total Students: 0"));
        assert!(!report.lines().any(|line| line.contains(": ")
            && !line.starts_with("Total Students")));
    }

    #[test]
    fn reports_work_over_a_trait_object() {
        let dir = TempDir::new().expect("tempdir");
        let store = populated(&dir);
        let dyn_store: &dyn RecordStore = &store;

        let report = ReportEngine::new(dyn_store).year_report(2);

        assert!(report.ends_with("Total Students: 2\n"));
    }
}
