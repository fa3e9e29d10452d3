use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::Instrument;

use super::Command;
use crate::config::N8nConfig;
use crate::n8n::N8nClient;
use crate::telemetry::{create_run_span, generate_correlation_id};
use crate::workflows::{default_workflows, ProvisionReport, Provisioner};

const RULE: &str = "==================================================";

/// Provision every default workflow and print progress to stdout
pub struct SetupCommand {
    pub dry_run: bool,
    pub env_file: Option<PathBuf>,
    config: Option<N8nConfig>,
}

impl Default for SetupCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupCommand {
    pub fn new() -> Self {
        Self {
            dry_run: false,
            env_file: None,
            config: None,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_env_file(mut self, env_file: Option<PathBuf>) -> Self {
        self.env_file = env_file;
        self
    }

    /// Use a ready-made configuration instead of reading files and environment
    pub fn with_config(mut self, config: N8nConfig) -> Self {
        self.config = Some(config);
        self
    }

    fn resolve_config(&self) -> Result<N8nConfig> {
        if let Some(config) = &self.config {
            return Ok(config.clone());
        }

        N8nConfig::load_env_file(self.env_file.as_deref())?;
        N8nConfig::load()
    }

    /// Run the provisioning and return the per-workflow outcomes
    pub async fn run(&self) -> Result<ProvisionReport> {
        let config = self.resolve_config()?;
        let client = N8nClient::from_config(&config).context("Failed to create n8n client")?;
        let span = create_run_span(client.base_url(), self.dry_run, &generate_correlation_id());

        async {
            tracing::info!(credentials = ?client.credentials(), "Starting workflow provisioning");

            if self.dry_run {
                println!("Setting up n8n workflows for SHAAD... (DRY RUN)");
            } else {
                println!("Setting up n8n workflows for SHAAD...");
            }
            println!("{RULE}");

            let provisioner = Provisioner::new(client).with_dry_run(self.dry_run);
            let report = provisioner
                .setup_all_workflows()
                .await
                .context("Workflow provisioning aborted")?;

            println!("{RULE}");
            print_summary(&report, self.dry_run);

            tracing::info!(
                created = report.created(),
                existing = report.existing(),
                failed = report.failed(),
                "Workflow provisioning finished"
            );
            Ok::<_, anyhow::Error>(report)
        }
        .instrument(span)
        .await
    }
}

impl Command for SetupCommand {
    async fn execute(&self) -> Result<()> {
        self.run().await.map(|_| ())
    }
}

fn print_summary(report: &ProvisionReport, dry_run: bool) {
    if dry_run {
        println!("✓ Dry run complete, no workflows were created");
    } else {
        println!("✓ Workflow setup complete!");
    }

    if report.failed() > 0 {
        println!(
            "⚠️  {} workflow(s) could not be created, see messages above",
            report.failed()
        );
    }

    println!();
    println!("Available workflows:");
    for template in default_workflows() {
        println!("- {}: {}", template.name(), template.summary);
    }
}
