//! `todosync` binary

mod cli;

use anyhow::{Context, Result};
use cli::Invocation;
use todosync_engine::{ConfigError, Operation, SyncError};
use todosync_remote::{MotionClient, API_TOKEN_ENV};
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(invocation: Invocation) -> Result<()> {
    match invocation {
        Invocation::Sync {
            config,
            api_key,
            workspace_id,
            base_url,
        } => {
            let remote = Invocation::remote_config(api_key, workspace_id, base_url)
                .ok_or(SyncError::Config(ConfigError::MissingCredential(API_TOKEN_ENV)))?;
            let client = MotionClient::new(remote)
                .map_err(|e| SyncError::Config(ConfigError::Remote(e.to_string())))?;

            let summary = todosync_engine::sync(config, &client)
                .await
                .context("sync failed")?;

            if summary.dry_run() {
                println!("Dry run complete:");
                println!("  TODOs to be added: {}", summary.created());
                println!("  TODOs to be updated: {}", summary.updated());
                println!("  TODOs to be completed: {}", summary.completed());
                println!("  TODOs to be retired: {}", summary.retired());
            } else {
                println!("Sync complete:");
                println!(
                    "  TODOs added: {} ({} failed)",
                    summary.created(),
                    summary.failed(Operation::Create)
                );
                println!(
                    "  TODOs updated: {} ({} failed)",
                    summary.updated(),
                    summary.failed(Operation::Update)
                );
                println!(
                    "  TODOs completed: {} ({} failed)",
                    summary.completed(),
                    summary.failed(Operation::Delete)
                );
                println!("  TODOs retired (already gone remotely): {}", summary.retired());
            }
            if summary.skipped_files > 0 {
                println!("  Files skipped: {}", summary.skipped_files);
            }
            for path in &summary.exports {
                println!("  Exported: {}", path.display());
            }
        }
        Invocation::Export { source, export } => {
            if !export.any() {
                eprintln!("No export option specified. Use --export-json and/or --export-md.");
            }
            let summary = todosync_engine::export(&source, &export).context("export failed")?;
            println!("Extracted {} TODO(s)", summary.candidates);
            for path in &summary.exports {
                println!("Exported: {}", path.display());
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let matches = cli::command().get_matches();
    init_logging(matches.get_flag("debug"));

    let Some(invocation) = cli::invocation(&matches) else {
        std::process::exit(2);
    };

    if let Err(e) = run(invocation).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
