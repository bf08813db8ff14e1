//! Domain models for the store service and the QA harness.

pub mod customer;
pub mod order;
pub mod product;
pub mod test_case;
pub mod test_result;

// Re-export commonly used types
pub use customer::{CustomerResponse, NewCustomer};
pub use order::{NewOrder, OrderResponse};
pub use product::{CreateProductRequest, NewProduct, ProductPatch, ProductResponse};
pub use test_case::{CaseSelection, NewTestCase, Protocol, TestCase, TestCaseResponse};
pub use test_result::{NewTestResult, Outcome, PENDING_DEFECT_KEY, RESPONSE_SNIPPET_LIMIT};
