//! Result persistence. Every executed case ends here, pass or fail.

use std::time::Instant;

use tracing::{error, info, warn};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::test_result::truncate_chars;
use crate::models::{NewTestResult, Outcome, RESPONSE_SNIPPET_LIMIT};

/// What a case execution produced, ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseExecution {
    pub outcome: Outcome,
    pub actual_status: u16,
    pub actual_response: String,
    pub defect_key: Option<String>,
}

pub struct ResultRecorder {
    pool: DbPool,
    environment: String,
    tester: String,
}

impl ResultRecorder {
    pub fn new(pool: DbPool, environment: impl Into<String>, tester: impl Into<String>) -> Self {
        Self {
            pool,
            environment: environment.into(),
            tester: tester.into(),
        }
    }

    /// Append one result row for `test_id`.
    ///
    /// Storage errors are returned to the caller and must abort the run.
    pub async fn record(
        &self,
        test_id: &str,
        execution: CaseExecution,
        retry_count: i32,
        started: Instant,
    ) -> AppResult<()> {
        let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

        info!(
            "Recording {}: result={}, actual_status={}, defect_key={:?}",
            test_id, execution.outcome, execution.actual_status, execution.defect_key
        );

        let row = NewTestResult {
            test_id: test_id.to_string(),
            outcome: execution.outcome,
            actual_status: i32::from(execution.actual_status),
            actual_response: truncate_chars(&execution.actual_response, RESPONSE_SNIPPET_LIMIT),
            defect_key: execution.defect_key,
            duration_ms,
            environment: self.environment.clone(),
            tester: self.tester.clone(),
            retry_count,
        };

        if let Err(e) = self.pool.insert_test_result(row).await {
            error!("Failed to record result for {}: {}", test_id, e);
            return Err(e);
        }

        match self.pool.latest_test_result(test_id).await {
            Ok(Some(saved)) => info!(
                "Result saved: {} result={} timestamp={}",
                saved.test_id, saved.result, saved.timestamp
            ),
            Ok(None) => warn!("Result for {} was not found after saving", test_id),
            Err(e) => warn!("Could not re-read result for {}: {}", test_id, e),
        }

        Ok(())
    }
}
