use clap::Parser;
use doxsearch::cli::{Cli, Commands, load_catalog, run_check, run_search, run_stats};
use doxsearch::config::SearchConfig;
use doxsearch::server::IndexServer;
use doxsearch::tracing::LogFormat;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries results and the MCP protocol, so logs go to stderr
    doxsearch::tracing::init(if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    });

    match cli.command {
        Commands::Search(args) => {
            let config = SearchConfig::discover(cli.config.as_deref(), &args.index)?;
            let catalog = load_catalog(&args.index, &config, args.no_cache)?;
            print!("{}", run_search(&catalog, &config, &args)?);
        }
        Commands::Stats {
            index,
            json,
            no_cache,
        } => {
            let config = SearchConfig::discover(cli.config.as_deref(), &index)?;
            let catalog = load_catalog(&index, &config, no_cache)?;
            print!("{}", run_stats(&catalog, json)?);
        }
        Commands::Check { index } => {
            let config = SearchConfig::discover(cli.config.as_deref(), &index)?;
            let catalog = load_catalog(&index, &config, true)?;
            print!("{}", run_check(&catalog));
        }
        Commands::Serve { index, no_cache } => {
            let config = SearchConfig::discover(cli.config.as_deref(), &index)?;
            let catalog = load_catalog(&index, &config, no_cache)?;

            tracing::info!(
                "Starting doxsearch MCP server for {} ({} entries)",
                index.display(),
                catalog.len()
            );

            let server = IndexServer::new(Arc::new(catalog), config);
            let service = server.serve(stdio()).await.inspect_err(|e| {
                tracing::error!("Error serving MCP server: {:?}", e);
            })?;

            service.waiting().await?;
        }
    }

    Ok(())
}
