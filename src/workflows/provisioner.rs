use tracing::{info, info_span, Instrument};

use super::catalog::{default_workflows, WorkflowTemplate};
use crate::n8n::errors::Result;
use crate::n8n::WorkflowApi;

/// What happened to a single template during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// A workflow with the same name was already listed by n8n
    AlreadyExists,
    Created { id: String },
    /// n8n rejected the create request
    Failed,
    /// Dry run: the workflow is missing and would have been created
    WouldCreate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionResult {
    pub name: String,
    pub outcome: ProvisionOutcome,
}

/// Per-template outcomes of one run, in provisioning order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub results: Vec<ProvisionResult>,
}

impl ProvisionReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, ProvisionOutcome::Created { .. }))
    }

    pub fn existing(&self) -> usize {
        self.count(|o| matches!(o, ProvisionOutcome::AlreadyExists))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ProvisionOutcome::Failed))
    }

    pub fn outcome_of(&self, name: &str) -> Option<&ProvisionOutcome> {
        self.results
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    fn count(&self, predicate: impl Fn(&ProvisionOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

/// Creates the default workflows that n8n does not know about yet.
///
/// The workflow name is the idempotency key: a template is only submitted when
/// no listed workflow carries its exact name. Templates are handled one after
/// another and a rejected create never stops the remaining ones.
pub struct Provisioner<A> {
    api: A,
    dry_run: bool,
}

impl<A: WorkflowApi> Provisioner<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Check for the template by name and create it when missing
    pub async fn provision(&self, template: &WorkflowTemplate) -> Result<ProvisionOutcome> {
        let name = template.name();

        if self.api.workflow_exists(name).await? {
            println!("✓ Workflow '{name}' already exists");
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        if self.dry_run {
            println!("→ Would create workflow '{name}'");
            return Ok(ProvisionOutcome::WouldCreate);
        }

        match self.api.create_workflow(&template.definition).await? {
            Some(id) => {
                println!("✓ Created workflow '{name}' with ID: {id}");
                Ok(ProvisionOutcome::Created { id })
            }
            None => Ok(ProvisionOutcome::Failed),
        }
    }

    /// Provision the given templates in order
    pub async fn setup_workflows(&self, templates: &[WorkflowTemplate]) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();

        for template in templates {
            let span = info_span!("provision_workflow", workflow = %template.name());
            let outcome = self.provision(template).instrument(span).await?;
            info!(workflow = %template.name(), outcome = ?outcome, "Provisioned workflow");

            report.results.push(ProvisionResult {
                name: template.name().to_string(),
                outcome,
            });
        }

        Ok(report)
    }

    /// Provision all default SHAAD workflows
    pub async fn setup_all_workflows(&self) -> Result<ProvisionReport> {
        self.setup_workflows(&default_workflows()).await
    }
}
