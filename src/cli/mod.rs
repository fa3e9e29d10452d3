use clap::Parser;
use std::path::PathBuf;

pub mod commands;

#[derive(Parser, Debug)]
#[command(name = "shaad-n8n-setup")]
#[command(version)]
#[command(about = "Provision the default SHAAD workflows into n8n")]
#[command(long_about = "Creates the SHAAD notification, web search, home control and task \
                       scheduling workflows in an n8n instance. Workflows that already exist \
                       (matched by name) are left untouched, so the command is safe to re-run. \
                       Connection settings come from N8N_HOST, N8N_PORT, N8N_API_KEY, \
                       N8N_BASIC_AUTH_USER and N8N_BASIC_AUTH_PASSWORD.")]
pub struct Cli {
    /// Show what would be created without making changes
    #[arg(long, help = "Check which workflows exist but do not create any")]
    pub dry_run: bool,

    /// Load environment variables from this file instead of ./.env or ../.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Emit debug-level diagnostics on stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Emit diagnostics as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
