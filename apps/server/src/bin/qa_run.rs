//! Run the API test harness.
//!
//! Usage:
//!   qa-run                          run every case
//!   qa-run --test-ids TC_001,TC_002 run only these cases
//!   qa-run --run-failed             re-run cases with a recorded failure
//!
//! Exit status: 0 when every case passed, 1 when any case did not pass,
//! 2 when the run could not complete.

use std::env;
use std::sync::Arc;

use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use store_qa_lib::config::Config;
use store_qa_lib::db::DbPool;
use store_qa_lib::harness::{RunError, RunOrchestrator};
use store_qa_lib::models::CaseSelection;
use store_qa_lib::tracker::JiraClient;

struct Args {
    test_ids: Option<String>,
    run_failed: bool,
}

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

    let args = parse_args(env::args().skip(1).collect());
    let selection = CaseSelection::from_args(args.test_ids.as_deref(), args.run_failed);

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(2);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(2);
        }
    };
    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(2);
    }

    let tracker = match JiraClient::new(&config.tracker) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error creating tracker client: {}", e);
            std::process::exit(2);
        }
    };

    let orchestrator = match RunOrchestrator::from_config(pool, &config, tracker) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error creating dispatcher: {}", e);
            std::process::exit(2);
        }
    };

    match orchestrator.run(&selection).await {
        Ok(summary) => {
            println!("\n=== Test run summary ===");
            println!("{}", summary);
        }
        Err(RunError::Failed(summary)) => {
            println!("\n=== Test run summary ===");
            println!("{}", summary);
            eprintln!("\nFailures:\n{}", summary.failures.join("\n"));
            std::process::exit(1);
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            eprintln!("Run aborted: {}", e);
            std::process::exit(2);
        }
    }
}

fn parse_args(args: Vec<String>) -> Args {
    let mut parsed = Args {
        test_ids: None,
        run_failed: false,
    };

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if let Some(value) = arg.strip_prefix("--test-ids=") {
            parsed.test_ids = Some(value.to_string());
        } else if arg == "--test-ids" {
            if i + 1 >= args.len() {
                eprintln!("Error: --test-ids requires a value");
                print_usage();
                std::process::exit(2);
            }
            parsed.test_ids = Some(args[i + 1].clone());
            i += 1;
        } else if arg == "--run-failed" {
            parsed.run_failed = true;
        } else if matches!(arg, "help" | "--help" | "-h") {
            print_usage();
            std::process::exit(0);
        } else {
            eprintln!("Unknown argument: {}", arg);
            print_usage();
            std::process::exit(2);
        }
        i += 1;
    }

    parsed
}

fn print_usage() {
    println!(
        r#"
Store API test harness

USAGE:
    qa-run [--test-ids <ID,ID,...>] [--run-failed]

OPTIONS:
    --test-ids <IDS>    Comma-separated test ids to run (takes precedence)
    --run-failed        Run only cases with at least one "not passed" result

ENVIRONMENT:
    QA_REST_BASE_URL    REST target (default: http://127.0.0.1:8000)
    QA_SOAP_ENDPOINT    SOAP target (default: http://127.0.0.1:8000/soap/)
    JIRA_SERVER, JIRA_USERNAME, JIRA_API_TOKEN, JIRA_PROJECT_KEY, QA_ISSUE_KEY
"#
    );
}
