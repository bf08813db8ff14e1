//! Store QA library.
//!
//! A demo online store (REST + SOAP) and the test-execution pipeline that
//! exercises it: case selection, dispatch, verification, defect reporting
//! and result recording.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod harness;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
pub mod soap;
pub mod tracker;
