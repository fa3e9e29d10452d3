// SHAAD n8n setup - provisions the default assistant workflows into n8n
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod n8n;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use config::{Credentials, N8nConfig};
pub use n8n::{N8nClient, N8nError, WorkflowApi, WorkflowRecord};
pub use telemetry::{generate_correlation_id, init_telemetry, LogFormat};
pub use workflows::{
    default_workflows, ProvisionOutcome, ProvisionReport, Provisioner, WorkflowDefinition,
    WorkflowTemplate,
};
