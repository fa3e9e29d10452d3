//! Client for the n8n public REST API

pub mod client;
pub mod errors;
pub mod types;

pub use client::{N8nClient, WorkflowApi, API_KEY_HEADER};
pub use errors::N8nError;
pub use types::WorkflowRecord;
