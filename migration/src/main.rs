use std::{fs, path::Path, process::ExitCode};
use util::config;

mod runner;

#[tokio::main]
async fn main() -> ExitCode {
    let db_path = config::database_path();
    let url = format!("sqlite://{}?mode=rwc", db_path);

    let result = match std::env::args().nth(1).as_deref() {
        Some("clean") => {
            remove_db_file(&db_path);
            return ExitCode::SUCCESS;
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await
        }
        _ => {
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Migration failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if !db_path.exists() {
        println!("DB file does not exist: {}", db_path.display());
        return;
    }
    match fs::remove_file(db_path) {
        Ok(()) => println!("Deleted DB: {}", db_path.display()),
        Err(e) => eprintln!("Failed to delete {}: {e}", db_path.display()),
    }
}

fn create_db_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Failed to create DB directory {}: {e}", parent.display());
        }
    }
}
