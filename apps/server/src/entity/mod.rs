//! SeaORM entity definitions for the store and the QA case/result tables.

pub mod customer;
pub mod order;
pub mod product;
pub mod test_case;
pub mod test_result;
