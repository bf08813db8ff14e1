//! Fixture and tracker tooling.
//!
//! Usage:
//!   qa-admin seed
//!   qa-admin import-cases <file.json>
//!   qa-admin clear-cases
//!   qa-admin clear-results
//!   qa-admin sync-tracker
//!   qa-admin check-tracker

use std::env;
use std::path::Path;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use store_qa_lib::config::Config;
use store_qa_lib::db::DbPool;
use store_qa_lib::services::{self, fixtures};
use store_qa_lib::tracker::JiraClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = args[1].as_str();
    if matches!(command, "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    if command == "check-tracker" {
        check_tracker(&config).await;
        return;
    }

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    match command {
        "seed" => seed(&pool).await,
        "import-cases" => {
            let Some(path) = args.get(2) else {
                eprintln!("Error: import-cases requires a file path");
                std::process::exit(1);
            };
            import_cases(&pool, Path::new(path)).await;
        }
        "clear-cases" => match pool.delete_all_test_cases().await {
            Ok(n) => println!("Deleted {} test case(s).", n),
            Err(e) => fail("Error clearing test cases", e),
        },
        "clear-results" => match pool.delete_all_test_results().await {
            Ok(n) => println!("Deleted {} test result(s).", n),
            Err(e) => fail("Error clearing test results", e),
        },
        "sync-tracker" => sync_tracker(&pool, &config).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", context, err);
    std::process::exit(1);
}

async fn seed(pool: &DbPool) {
    match fixtures::seed(pool).await {
        Ok(report) => {
            println!();
            println!("{:<12} {:>8} {:>8}", "TABLE", "ADDED", "SKIPPED");
            for (table, counts) in [
                ("products", &report.products),
                ("customers", &report.customers),
                ("orders", &report.orders),
                ("test_cases", &report.test_cases),
            ] {
                println!("{:<12} {:>8} {:>8}", table, counts.inserted, counts.skipped);
            }
            println!();
        }
        Err(e) => fail("Error seeding fixtures", e),
    }
}

async fn import_cases(pool: &DbPool, path: &Path) {
    match services::import_cases(pool, path).await {
        Ok(report) => println!(
            "Imported {} test case(s), skipped {} existing.",
            report.inserted, report.skipped
        ),
        Err(e) => fail("Error importing test cases", e),
    }
}

fn tracker_client(config: &Config) -> JiraClient {
    match JiraClient::new(&config.tracker) {
        Ok(client) => client,
        Err(e) => fail("Error creating tracker client", e),
    }
}

async fn sync_tracker(pool: &DbPool, config: &Config) {
    let client = tracker_client(config);
    match services::sync_cases(pool, &client, &config.tracker.project_key).await {
        Ok(report) => {
            for key in &report.created {
                println!("Created {}", key);
            }
            println!(
                "Created {} issue(s), {} case(s) already tracked.",
                report.created.len(),
                report.skipped.len()
            );
        }
        Err(e) => fail("Error syncing test cases to tracker", e),
    }
}

async fn check_tracker(config: &Config) {
    let client = tracker_client(config);
    match services::check_connection(&client, &config.tracker.project_key).await {
        Ok(status) => {
            println!("Tracker connection OK.");
            println!("Project {} exists: {}", status.project_key, status.project_name);
            println!("Found {} issue(s) in project {}", status.issue_count, status.project_key);
        }
        Err(e) => fail("Tracker connection failed", e),
    }
}

fn print_usage() {
    println!(
        r#"
Store QA fixture tooling

USAGE:
    qa-admin <COMMAND>

COMMANDS:
    seed                   Insert demo products, customers, orders and the SOAP cases
    import-cases <FILE>    Insert test cases from a JSON array, skipping existing ids
    clear-cases            Delete all test cases
    clear-results          Delete all recorded test results
    sync-tracker           Create a tracker Task for every untracked test case
    check-tracker          Verify tracker credentials and project access
    help                   Show this help
"#
    );
}
