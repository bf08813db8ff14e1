//! Test-execution and defect-reporting pipeline.

pub mod dispatcher;
pub mod orchestrator;
pub mod payloads;
pub mod recorder;
pub mod reporter;
pub mod verifier;

pub use dispatcher::{DispatchError, Dispatcher, RawResponse};
pub use orchestrator::{CaseSummary, RunError, RunOrchestrator, RunSummary, issue_key_for};
pub use recorder::{CaseExecution, ResultRecorder};
pub use reporter::DefectReporter;
pub use verifier::{VerifyError, verify};
