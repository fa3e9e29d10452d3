use anyhow::Result;
use clap::Parser;

use shaad_n8n_setup::cli::commands::{Command, SetupCommand};
use shaad_n8n_setup::cli::Cli;
use shaad_n8n_setup::telemetry::{init_telemetry, LogFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_telemetry(cli.verbose, format)?;

    // Requests are issued strictly one after another, a single thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        SetupCommand::new()
            .with_dry_run(cli.dry_run)
            .with_env_file(cli.env_file)
            .execute()
            .await
    })
}
