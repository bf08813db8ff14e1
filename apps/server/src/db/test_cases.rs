//! Case store queries: test case fixtures.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::test_case::{self, ActiveModel, Entity as TestCase};
use crate::error::{AppError, AppResult};
use crate::models::NewTestCase;

use super::DbPool;

impl DbPool {
    /// List all test cases in store order.
    pub async fn list_test_cases(&self) -> AppResult<Vec<test_case::Model>> {
        TestCase::find()
            .order_by_asc(test_case::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))
    }

    /// Get the test cases whose test_id is in `test_ids`, in store order.
    pub async fn get_test_cases_by_ids(
        &self,
        test_ids: &[String],
    ) -> AppResult<Vec<test_case::Model>> {
        if test_ids.is_empty() {
            return Ok(Vec::new());
        }

        TestCase::find()
            .filter(test_case::Column::TestId.is_in(test_ids.iter().cloned()))
            .order_by_asc(test_case::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test cases: {}", e)))
    }

    /// Check whether a case with this test_id exists.
    pub async fn test_case_exists(&self, test_id: &str) -> AppResult<bool> {
        let count = TestCase::find()
            .filter(test_case::Column::TestId.eq(test_id))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to look up test case: {}", e)))?;

        Ok(count > 0)
    }

    /// Insert a new test case.
    pub async fn insert_test_case(&self, new: NewTestCase) -> AppResult<test_case::Model> {
        let model = ActiveModel {
            test_id: Set(new.test_id),
            description: Set(new.description),
            endpoint: Set(new.endpoint),
            method: Set(new.method),
            test_type: Set(new.test_type),
            expected_status: Set(new.expected_status),
            expected_response: Set(new.expected_response),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))
    }

    /// Delete every test case. Returns the number of rows removed.
    pub async fn delete_all_test_cases(&self) -> AppResult<u64> {
        let result = TestCase::delete_many()
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test cases: {}", e)))?;

        Ok(result.rows_affected)
    }
}
