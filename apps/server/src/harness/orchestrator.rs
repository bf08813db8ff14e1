//! Run orchestration: select cases, then execute each one to completion
//! (dispatch, verify, report, record) before starting the next.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::dispatcher::{DispatchError, Dispatcher};
use super::recorder::{CaseExecution, ResultRecorder};
use super::reporter::DefectReporter;
use super::verifier;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::{CaseSelection, Outcome, PENDING_DEFECT_KEY, Protocol, TestCase};
use crate::tracker::IssueTracker;

/// Offset added to SOAP case numbers so their tracker issues do not collide
/// with REST ones.
pub const SOAP_ISSUE_OFFSET: u32 = 20;

/// Tracker issue a case was written up in: `<prefix>-<n>`.
///
/// `None` when the test id has no numeric suffix, or the offset SOAP
/// number would not fit.
pub fn issue_key_for(case: &TestCase, prefix: &str) -> Option<String> {
    let number = case.number()?;
    let number = match case.protocol() {
        Protocol::Rest => number,
        Protocol::Soap => number.checked_add(SOAP_ISSUE_OFFSET)?,
    };
    Some(format!("{}-{}", prefix, number))
}

/// Per-case line of a run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSummary {
    pub test_id: String,
    pub outcome: Outcome,
    pub defect_key: Option<String>,
}

/// Outcome of a whole run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cases: Vec<CaseSummary>,
    /// One description per case that did not pass
    pub failures: Vec<String>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.cases.iter().all(|c| c.outcome.is_passed())
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            match (&case.outcome, &case.defect_key) {
                (Outcome::Passed, _) => writeln!(f, "Test {}: Passed", case.test_id)?,
                (Outcome::NotPassed, key) => writeln!(
                    f,
                    "Test {}: Not Passed, Defect: {}",
                    case.test_id,
                    key.as_deref().unwrap_or(PENDING_DEFECT_KEY)
                )?,
            }
        }
        write!(
            f,
            "{} passed, {} not passed, {} total",
            self.passed(),
            self.failed(),
            self.cases.len()
        )
    }
}

/// Run-level errors.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Case selection or result persistence failed; the run was aborted.
    #[error("Case store error: {0}")]
    Store(#[from] AppError),

    /// The run completed but at least one case did not pass.
    #[error("{}", .0.failures.join("\n"))]
    Failed(RunSummary),
}

/// How one case ended before recording.
enum Attempt {
    Passed {
        status: u16,
        response: String,
    },
    /// Response received but did not match expectations
    Mismatch {
        status: u16,
        reason: String,
    },
    /// No verifiable response
    Errored {
        status: u16,
        error: String,
    },
}

pub struct RunOrchestrator {
    pool: DbPool,
    dispatcher: Dispatcher,
    reporter: DefectReporter,
    recorder: ResultRecorder,
    issue_prefix: String,
}

impl RunOrchestrator {
    pub fn new(
        pool: DbPool,
        dispatcher: Dispatcher,
        reporter: DefectReporter,
        recorder: ResultRecorder,
        issue_prefix: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            dispatcher,
            reporter,
            recorder,
            issue_prefix: issue_prefix.into(),
        }
    }

    /// Wire up the pipeline from configuration and an explicit tracker.
    pub fn from_config(
        pool: DbPool,
        config: &Config,
        tracker: Arc<dyn IssueTracker>,
    ) -> Result<Self, DispatchError> {
        let dispatcher = Dispatcher::new(&config.harness)?;
        let reporter = DefectReporter::new(tracker, config.tracker.project_key.clone());
        let recorder = ResultRecorder::new(
            pool.clone(),
            config.harness.run_environment.clone(),
            config.harness.tester.clone(),
        );

        Ok(Self::new(
            pool,
            dispatcher,
            reporter,
            recorder,
            config.tracker.issue_prefix.clone(),
        ))
    }

    /// Resolve a selection to cases in store order.
    pub async fn select(&self, selection: &CaseSelection) -> Result<Vec<TestCase>, AppError> {
        let models = match selection {
            CaseSelection::All => self.pool.list_test_cases().await?,
            CaseSelection::Ids(ids) => {
                info!("Filtering cases by test_ids: {:?}", ids);
                self.pool.get_test_cases_by_ids(ids).await?
            }
            CaseSelection::PreviouslyFailed => {
                let failed = self.pool.failed_test_ids().await?;
                if failed.is_empty() {
                    info!("No previously failed cases");
                    return Ok(Vec::new());
                }
                info!("Re-running previously failed cases: {:?}", failed);
                self.pool.get_test_cases_by_ids(&failed).await?
            }
        };

        Ok(models.into_iter().map(TestCase::from).collect())
    }

    /// Execute every selected case in order.
    ///
    /// Fails with [`RunError::Failed`] when any case did not pass, and with
    /// [`RunError::Store`] as soon as a result cannot be persisted.
    pub async fn run(&self, selection: &CaseSelection) -> Result<RunSummary, RunError> {
        let cases = self.select(selection).await?;
        info!(
            "Selected cases: {:?}",
            cases.iter().map(|c| c.test_id.as_str()).collect::<Vec<_>>()
        );

        let mut summary = RunSummary::default();
        for case in &cases {
            self.execute(case, &mut summary).await?;
        }

        if summary.is_success() {
            Ok(summary)
        } else {
            Err(RunError::Failed(summary))
        }
    }

    async fn execute(&self, case: &TestCase, summary: &mut RunSummary) -> Result<(), AppError> {
        let started = Instant::now();
        let retry_count = i32::try_from(self.pool.count_test_results(&case.test_id).await?)
            .unwrap_or(i32::MAX);
        let issue_key = issue_key_for(case, &self.issue_prefix);
        info!(
            "Starting {} (issue: {}, retry_count: {})",
            case.test_id,
            issue_key.as_deref().unwrap_or("-"),
            retry_count
        );

        let attempt = match self.dispatcher.dispatch(case).await {
            Ok(response) => match verifier::verify(case, &response) {
                Ok(stored) => Attempt::Passed {
                    status: response.status,
                    response: stored,
                },
                Err(e) if e.is_structural() => Attempt::Errored {
                    status: response.status,
                    error: e.to_string(),
                },
                Err(e) => Attempt::Mismatch {
                    status: response.status,
                    reason: e.to_string(),
                },
            },
            Err(e) => Attempt::Errored {
                status: e.status(),
                error: e.to_string(),
            },
        };

        let execution = match attempt {
            Attempt::Passed { status, response } => {
                info!("{} passed", case.test_id);
                CaseExecution {
                    outcome: Outcome::Passed,
                    actual_status: status,
                    actual_response: response,
                    defect_key: None,
                }
            }
            Attempt::Mismatch { status, reason } => {
                warn!("{} not passed: {}", case.test_id, reason);
                let failure_text = format!(
                    "Expected: {}, Got: {}",
                    case.expected_response.as_deref().unwrap_or_default(),
                    status
                );
                let defect_key = self
                    .file_defect(case, issue_key.as_deref(), status, &failure_text)
                    .await;
                summary
                    .failures
                    .push(format!("Test {} not passed: {}", case.test_id, reason));
                CaseExecution {
                    outcome: Outcome::NotPassed,
                    actual_status: status,
                    actual_response: failure_text,
                    defect_key: Some(defect_key),
                }
            }
            Attempt::Errored { status, error } => {
                warn!("{} not passed due to error: {}", case.test_id, error);
                let failure_text = format!("Error: {}", error);
                let defect_key = self
                    .file_defect(case, issue_key.as_deref(), status, &failure_text)
                    .await;
                summary.failures.push(format!(
                    "Test {} not passed due to error: {}",
                    case.test_id, error
                ));
                CaseExecution {
                    outcome: Outcome::NotPassed,
                    actual_status: status,
                    actual_response: failure_text,
                    defect_key: Some(defect_key),
                }
            }
        };

        summary.cases.push(CaseSummary {
            test_id: case.test_id.clone(),
            outcome: execution.outcome,
            defect_key: execution.defect_key.clone(),
        });

        self.recorder
            .record(&case.test_id, execution, retry_count, started)
            .await
    }

    /// Report a defect, falling back to the pending marker.
    async fn file_defect(
        &self,
        case: &TestCase,
        issue_key: Option<&str>,
        status: u16,
        failure_text: &str,
    ) -> String {
        match self
            .reporter
            .report(case, issue_key, status, failure_text)
            .await
        {
            Some(key) => key,
            None => {
                warn!("Defect for {} was not filed; marking {}", case.test_id, PENDING_DEFECT_KEY);
                PENDING_DEFECT_KEY.to_string()
            }
        }
    }
}
