use clap::{Parser, Subcommand};
use log::LevelFilter;
use log4rs::Config;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Logger, Root};
use std::path::PathBuf;
use std::process::ExitCode;
use task_tracker::store::TaskStore;
use task_tracker::task::{Status, Task};

#[derive(Parser, Debug)]
#[command(name = "task-tracker", version, about = "Track tasks in a local JSON file")]
struct Cli {
    /// Path of the JSON file holding the tasks
    #[arg(short, long, global = true, default_value = "tasks.json")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Add a new task
    Add { description: String },
    /// Change the description of an existing task
    Update { id: String, description: String },
    /// Set the status of an existing task
    Status { id: String, status: Status },
    /// Remove a task permanently
    Delete { id: String },
    /// Show tasks, optionally only those with the given status
    List { status: Option<Status> },
    /// Show tasks that are still to do
    ListTodo,
    /// Show tasks that are in progress
    ListInProgress,
    /// Show tasks that are done
    ListDone,
}

fn main() -> ExitCode {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage problems get help text and a clean exit; only storage
            // failures exit non-zero.
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_fatal() => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::SUCCESS
        }
    }
}

fn run(cli: &Cli) -> Result<(), task_tracker::store::Error> {
    let store = TaskStore::new(&cli.file);
    store.init()?;

    match &cli.command {
        Commands::Add { description } => {
            let task = store.add(description)?;
            println!("Task added successfully:");
            println!("ID: {}", task.id);
            println!("Description: {}", task.description);
            println!("Status: {}", task.status);
        }
        Commands::Update { id, description } => {
            let task = store.update_description(id, description)?;
            println!("Task updated successfully:");
            println!("{task}");
        }
        Commands::Status { id, status } => {
            let task = store.set_status(id, *status)?;
            println!("Task status updated successfully:");
            println!("{task}");
        }
        Commands::Delete { id } => {
            store.delete(id)?;
            println!("Task deleted successfully with ID: {id}");
        }
        Commands::List { status } => print_tasks(&store.list(*status)?),
        Commands::ListTodo => print_tasks(&store.list(Some(Status::Todo))?),
        Commands::ListInProgress => print_tasks(&store.list(Some(Status::InProgress))?),
        Commands::ListDone => print_tasks(&store.list(Some(Status::Done))?),
    }
    Ok(())
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found");
        return;
    }
    for task in tasks {
        println!("{task}");
    }
}

fn init_logging() {
    let stdout = ConsoleAppender::builder().build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .logger(Logger::builder().build("task_tracker", LevelFilter::Info))
        .build(Root::builder().appender("stdout").build(LevelFilter::Warn))
        .unwrap();
    let _log4rs_handle = log4rs::init_config(config).unwrap();
}
