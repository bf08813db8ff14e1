//! Result history queries.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::entity::test_result::{self, ActiveModel, Entity as TestResult};
use crate::error::{AppError, AppResult};
use crate::models::{NewTestResult, Outcome};

use super::DbPool;

impl DbPool {
    /// Number of recorded results for a test id.
    pub async fn count_test_results(&self, test_id: &str) -> AppResult<u64> {
        TestResult::find()
            .filter(test_result::Column::TestId.eq(test_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test results: {}", e)))
    }

    /// Distinct test ids with at least one "not passed" result.
    pub async fn failed_test_ids(&self) -> AppResult<Vec<String>> {
        TestResult::find()
            .select_only()
            .column(test_result::Column::TestId)
            .filter(test_result::Column::Result.eq(Outcome::NotPassed.as_str()))
            .distinct()
            .order_by_asc(test_result::Column::TestId)
            .into_tuple::<String>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query failed tests: {}", e)))
    }

    /// Append a result row inside its own transaction.
    ///
    /// The transaction rolls back when dropped uncommitted, so an error here
    /// leaves no partial row behind.
    pub async fn insert_test_result(&self, new: NewTestResult) -> AppResult<test_result::Model> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let model = ActiveModel {
            test_id: Set(new.test_id),
            result: Set(new.outcome.as_str().to_string()),
            actual_status: Set(new.actual_status),
            actual_response: Set(new.actual_response),
            defect_key: Set(new.defect_key),
            timestamp: Set(Utc::now()),
            duration_ms: Set(new.duration_ms),
            environment: Set(new.environment),
            tester: Set(new.tester),
            retry_count: Set(new.retry_count),
            ..Default::default()
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test result: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit test result: {}", e)))?;

        Ok(inserted)
    }

    /// Most recent result for a test id (highest row id).
    pub async fn latest_test_result(&self, test_id: &str) -> AppResult<Option<test_result::Model>> {
        TestResult::find()
            .filter(test_result::Column::TestId.eq(test_id))
            .order_by_desc(test_result::Column::Id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get latest test result: {}", e)))
    }

    /// Full history for a test id, oldest first.
    pub async fn list_test_results(&self, test_id: &str) -> AppResult<Vec<test_result::Model>> {
        TestResult::find()
            .filter(test_result::Column::TestId.eq(test_id))
            .order_by_asc(test_result::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test results: {}", e)))
    }

    /// Purge all result history. Returns the number of rows removed.
    pub async fn delete_all_test_results(&self) -> AppResult<u64> {
        let result = TestResult::delete_many()
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test results: {}", e)))?;

        Ok(result.rows_affected)
    }
}
