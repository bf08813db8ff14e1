//! Test result entity: one append-only row per executed case.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "test_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub test_id: String,
    pub result: String,
    pub actual_status: i32,
    #[sea_orm(column_type = "Text")]
    pub actual_response: String,
    pub defect_key: Option<String>,
    pub timestamp: DateTimeUtc,
    pub duration_ms: i64,
    pub environment: String,
    pub tester: String,
    pub retry_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Logical link only: result history outlives cleared fixtures.
    #[sea_orm(
        belongs_to = "super::test_case::Entity",
        from = "Column::TestId",
        to = "super::test_case::Column::TestId"
    )]
    TestCase,
}

impl Related<super::test_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestCase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
