//! Fixture and tracker tooling used by `qa-admin`.

pub mod fixtures;
pub mod tracker_sync;

pub use fixtures::{FixtureReport, SeedReport, import_cases, seed};
pub use tracker_sync::{SyncError, SyncReport, TrackerStatus, check_connection, sync_cases};
