//! Command-line front end. Every command logs in first, then calls exactly
//! one core operation and prints what it returns.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use student_records::{
    parse_year, AppConfig, CredentialStore, QueryEngine, RecordStore, ReportEngine, SearchForm,
    SqliteRecordStore, StudentForm, StudentRecord,
};

/// Student records: manage student details, search them and print reports.
#[derive(Parser, Debug)]
#[command(name = "student-records")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the snapshot files (defaults to $STUDENT_RECORDS_DIR
    /// or ~/.student-records)
    #[arg(short = 'D', long)]
    pub data_dir: Option<PathBuf>,

    /// Account to log in with
    #[arg(short, long)]
    pub username: String,

    /// Password for the account
    #[arg(short, long)]
    pub password: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every student
    List,

    /// Show one student by exact ID
    Show { id: String },

    /// Add a new student
    Add(StudentArgs),

    /// Replace the details of an existing student
    Update(StudentArgs),

    /// Delete a student by ID
    Delete { id: String },

    /// Search with any combination of criteria (all must match)
    Search {
        /// Part of the student ID
        #[arg(long, default_value = "")]
        id: String,

        /// Part of the name
        #[arg(long, default_value = "")]
        name: String,

        /// Part of the course
        #[arg(long, default_value = "")]
        course: String,

        /// Exact year
        #[arg(long, default_value = "")]
        year: String,
    },

    /// Print a report
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },

    /// Create a new login account
    Register {
        username: String,
        password: String,

        #[arg(long, default_value = "staff")]
        role: String,
    },

    /// Show the logged-in account
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum ReportKind {
    /// Every student
    All,
    /// Students whose course contains NAME
    Course { name: String },
    /// Students in one year
    Year { year: String },
    /// Totals grouped by course and by year
    Stats,
}

/// Raw field values, validated through [`StudentForm`].
#[derive(Args, Debug)]
pub struct StudentArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub course: String,
    #[arg(long)]
    pub year: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
}

impl From<StudentArgs> for StudentForm {
    fn from(args: StudentArgs) -> Self {
        StudentForm {
            id: args.id,
            name: args.name,
            course: args.course,
            year: args.year,
            email: args.email,
            phone: args.phone,
        }
    }
}

pub fn execute(cli: Cli) -> Result<()> {
    let config = AppConfig::resolve(cli.data_dir.as_deref())?;
    let credentials = CredentialStore::open(config.accounts_path())
        .context("failed to open account store")?;
    credentials.login(&cli.username, &cli.password)?;

    let store = SqliteRecordStore::open(config.students_path())
        .context("failed to open student store")?;

    match cli.command {
        Commands::List => print_students(&store.all()),
        Commands::Show { id } => match store.find_by_id(&id) {
            Some(student) => print_students(&[student]),
            None => println!("Student {id} not found."),
        },
        Commands::Add(args) => {
            let student = StudentForm::from(args).parse_inputs()?;
            let id = student.id.clone();
            store.add(student)?;
            println!("Student {id} added.");
        }
        Commands::Update(args) => {
            let student = StudentForm::from(args).parse_inputs()?;
            let id = student.id.clone();
            store.update(student)?;
            println!("Student {id} updated.");
        }
        Commands::Delete { id } => {
            let removed = store.delete(&id)?;
            println!("Deleted {}: {removed}", removed.id);
        }
        Commands::Search {
            id,
            name,
            course,
            year,
        } => {
            let criteria = SearchForm {
                id,
                name,
                course,
                year,
            }
            .parse_inputs()?;
            let results = QueryEngine::new(&store).search(&criteria);
            if results.is_empty() {
                println!("No students found matching the search criteria.");
            } else {
                print_students(&results);
            }
        }
        Commands::Report { kind } => {
            let reports = ReportEngine::new(&store);
            let text = match kind {
                ReportKind::All => reports.all_students_report(),
                ReportKind::Course { name } => reports.course_report(&name),
                ReportKind::Year { year } => reports.year_report(parse_year(&year)?),
                ReportKind::Stats => reports.statistics_report(),
            };
            print!("{text}");
        }
        Commands::Register {
            username,
            password,
            role,
        } => {
            let account = credentials.register(&username, &password, &role)?;
            println!("Registered {account}.");
        }
        Commands::Whoami => {
            if let Some(account) = credentials.current_user() {
                println!("{account}");
            }
        }
    }

    credentials.logout();
    Ok(())
}

fn print_students(students: &[StudentRecord]) {
    for student in students {
        println!(
            "{:<10} {:<25} {:<20} {:<5} {:<25} {}",
            student.id, student.name, student.course, student.year, student.email, student.phone
        );
    }
}
