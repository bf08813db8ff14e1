//! Shared fixtures: in-process store server, case store and fake tracker.

use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpServer, web};
use async_trait::async_trait;

use store_qa_lib::api::configure_store;
use store_qa_lib::config::{DatabaseSettings, HarnessSettings};
use store_qa_lib::db::DbPool;
use store_qa_lib::harness::{DefectReporter, Dispatcher, ResultRecorder, RunOrchestrator};
use store_qa_lib::models::NewTestCase;
use store_qa_lib::services::fixtures;
use store_qa_lib::tracker::{Issue, IssueTracker, IssueType, NewIssue, TrackerError};

pub const PROJECT_KEY: &str = "QA";
pub const ISSUE_PREFIX: &str = "QA";

const CASES_JSON: &str = include_str!("../../fixtures/test_cases.json");

/// Fresh in-memory database with the schema applied.
pub async fn memory_pool() -> DbPool {
    let pool = DbPool::connect(&DatabaseSettings::in_memory())
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// A store service listening on 127.0.0.1 with its own seeded database.
pub struct StoreServer {
    pub base_url: String,
}

impl StoreServer {
    pub async fn start() -> Self {
        let pool = memory_pool().await;
        fixtures::seed(&pool).await.expect("Failed to seed store");

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(configure_store)
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        tokio::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
        }
    }

    pub fn settings(&self) -> HarnessSettings {
        HarnessSettings {
            rest_base_url: self.base_url.clone(),
            soap_endpoint: format!("{}/soap/", self.base_url),
            run_environment: "test".to_string(),
            tester: "harness-suite".to_string(),
        }
    }
}

/// Settings pointing at a port nothing listens on.
pub fn unreachable_settings() -> HarnessSettings {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    HarnessSettings {
        rest_base_url: format!("http://127.0.0.1:{}", port),
        soap_endpoint: format!("http://127.0.0.1:{}/soap/", port),
        run_environment: "test".to_string(),
        tester: "harness-suite".to_string(),
    }
}

/// Case store holding the bundled REST cases and the SOAP cases.
pub async fn case_pool() -> DbPool {
    let pool = memory_pool().await;
    let mut cases = fixtures::parse_cases(CASES_JSON).expect("Invalid case fixture");
    cases.extend(fixtures::soap_cases());
    fixtures::insert_cases(&pool, cases)
        .await
        .expect("Failed to insert cases");
    pool
}

/// Case store holding only the given cases.
pub async fn pool_with_cases(cases: Vec<NewTestCase>) -> DbPool {
    let pool = memory_pool().await;
    fixtures::insert_cases(&pool, cases)
        .await
        .expect("Failed to insert cases");
    pool
}

pub fn rest_case(
    test_id: &str,
    endpoint: &str,
    method: &str,
    expected_status: i32,
    expected_response: Option<&str>,
) -> NewTestCase {
    NewTestCase {
        test_id: test_id.to_string(),
        description: format!("{} {}", method, endpoint),
        endpoint: endpoint.to_string(),
        method: method.to_string(),
        test_type: "functional".to_string(),
        expected_status,
        expected_response: expected_response.map(str::to_string),
    }
}

pub fn orchestrator(
    pool: &DbPool,
    settings: &HarnessSettings,
    tracker: Arc<FakeTracker>,
) -> RunOrchestrator {
    let dispatcher = Dispatcher::new(settings).expect("Failed to build dispatcher");
    let reporter = DefectReporter::new(tracker, PROJECT_KEY);
    let recorder = ResultRecorder::new(
        pool.clone(),
        settings.run_environment.clone(),
        settings.tester.clone(),
    );
    RunOrchestrator::new(pool.clone(), dispatcher, reporter, recorder, ISSUE_PREFIX)
}

#[derive(Debug, Clone)]
pub struct FakeIssue {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: IssueType,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub issues: Vec<FakeIssue>,
    pub comments: Vec<(String, String)>,
    pub links: Vec<(String, String, String)>,
    pub searches: Vec<String>,
}

/// In-memory tracker. Summary search is a substring match on the quoted
/// value after `summary ~`.
#[derive(Default)]
pub struct FakeTracker {
    state: Mutex<FakeState>,
    failing: AtomicBool,
}

impl FakeTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn snapshot<T>(&self, f: impl FnOnce(&FakeState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    fn check(&self) -> Result<(), TrackerError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(TrackerError::Status {
                status: 503,
                body: "tracker unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn summary_term(jql: &str) -> Option<String> {
    let (_, rest) = jql.split_once("summary ~ ")?;
    let quoted = rest.trim().strip_prefix('"')?;
    let end = quoted.rfind('"')?;
    Some(quoted[..end].replace("\\\"", "\"").replace("\\\\", "\\"))
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn search(&self, jql: &str) -> Result<Vec<Issue>, TrackerError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.searches.push(jql.to_string());

        let term = summary_term(jql).unwrap_or_default();
        let bugs_only = jql.contains("issuetype=Bug");
        Ok(state
            .issues
            .iter()
            .filter(|i| i.summary.contains(&term))
            .filter(|i| !bugs_only || i.issue_type == IssueType::Bug)
            .map(|i| Issue {
                key: i.key.clone(),
                summary: i.summary.clone(),
            })
            .collect())
    }

    async fn create(&self, issue: NewIssue) -> Result<Issue, TrackerError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let key = format!("{}-{}", issue.project_key, 500 + state.issues.len());
        state.issues.push(FakeIssue {
            key: key.clone(),
            summary: issue.summary.clone(),
            description: issue.description,
            issue_type: issue.issue_type,
        });
        Ok(Issue {
            key,
            summary: issue.summary,
        })
    }

    async fn comment(&self, key: &str, body: &str) -> Result<(), TrackerError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .comments
            .push((key.to_string(), body.to_string()));
        Ok(())
    }

    async fn update_description(&self, key: &str, description: &str) -> Result<(), TrackerError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let issue = state
            .issues
            .iter_mut()
            .find(|i| i.key == key)
            .ok_or_else(|| TrackerError::Status {
                status: 404,
                body: format!("Issue {} does not exist", key),
            })?;
        issue.description = description.to_string();
        Ok(())
    }

    async fn link(&self, link_type: &str, inward: &str, outward: &str) -> Result<(), TrackerError> {
        self.check()?;
        self.state.lock().unwrap().links.push((
            link_type.to_string(),
            inward.to_string(),
            outward.to_string(),
        ));
        Ok(())
    }
}
