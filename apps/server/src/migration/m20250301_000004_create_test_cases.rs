//! Create test_cases table.
//!
//! Fixture rows loaded by `qa-admin`; the harness only reads them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestCases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestCases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TestCases::TestId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TestCases::Description).string().not_null())
                    .col(ColumnDef::new(TestCases::Endpoint).string().not_null())
                    .col(ColumnDef::new(TestCases::Method).string().not_null())
                    .col(ColumnDef::new(TestCases::TestType).string().not_null())
                    .col(ColumnDef::new(TestCases::ExpectedStatus).integer().not_null())
                    .col(ColumnDef::new(TestCases::ExpectedResponse).text())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestCases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestCases {
    Table,
    Id,
    TestId,
    Description,
    Endpoint,
    Method,
    TestType,
    ExpectedStatus,
    ExpectedResponse,
}
