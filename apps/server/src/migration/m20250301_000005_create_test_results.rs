//! Create test_results table.
//!
//! Append-only execution history. `test_id` is indexed but not a foreign key;
//! clearing fixtures leaves the history in place.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestResults::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestResults::TestId).string().not_null())
                    .col(ColumnDef::new(TestResults::Result).string().not_null())
                    .col(ColumnDef::new(TestResults::ActualStatus).integer().not_null())
                    .col(ColumnDef::new(TestResults::ActualResponse).text().not_null())
                    .col(ColumnDef::new(TestResults::DefectKey).string())
                    .col(
                        ColumnDef::new(TestResults::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TestResults::DurationMs)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TestResults::Environment)
                            .string()
                            .not_null()
                            .default("local"),
                    )
                    .col(
                        ColumnDef::new(TestResults::Tester)
                            .string()
                            .not_null()
                            .default("automated"),
                    )
                    .col(
                        ColumnDef::new(TestResults::RetryCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_results_test_id")
                    .table(TestResults::Table)
                    .col(TestResults::TestId)
                    .to_owned(),
            )
            .await?;

        // Backs the previously-failed selection
        manager
            .create_index(
                Index::create()
                    .name("idx_test_results_result")
                    .table(TestResults::Table)
                    .col(TestResults::Result)
                    .col(TestResults::TestId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestResults {
    Table,
    Id,
    TestId,
    Result,
    ActualStatus,
    ActualResponse,
    DefectKey,
    Timestamp,
    DurationMs,
    Environment,
    Tester,
    RetryCount,
}
