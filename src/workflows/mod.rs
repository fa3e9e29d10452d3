// Workflow templates and the provisioner that pushes them into n8n

pub mod catalog;
pub mod definition;
pub mod provisioner;

pub use catalog::{default_workflows, WorkflowTemplate};
pub use definition::{ConnectionTarget, Node, NodeConnections, WorkflowDefinition};
pub use provisioner::{ProvisionOutcome, ProvisionReport, ProvisionResult, Provisioner};
