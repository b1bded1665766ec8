//! Whelk MCP Server
//!
//! This binary runs the Whelk agent tools as an MCP server over stdio.

use std::path::PathBuf;

use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use whelk::{ReadLimits, SourceConfig};
use whelk_mcp::WhelkServer;

#[derive(Parser, Debug)]
#[command(name = "whelk-mcp")]
#[command(about = "MCP server exposing a virtual file store, todo list and source tree search")]
struct Args {
    /// Root of the source tree searched by search_source_files
    #[arg(long, env = "WHELK_SRC_ROOT", default_value = "src/main/java")]
    src_root: PathBuf,

    /// Documentation root that read_source_file may also open
    #[arg(long, env = "WHELK_DOC_ROOT", default_value = "docs")]
    doc_root: PathBuf,

    /// Source file extension to include (repeatable); replaces the defaults
    #[arg(long = "extension", value_name = "EXT")]
    extensions: Vec<String>,

    /// Maximum characters shown per line by read_file
    #[arg(long, default_value_t = ReadLimits::default().max_line_chars)]
    max_line_chars: usize,
}

impl Args {
    fn source_config(&self) -> SourceConfig {
        let config = SourceConfig::new(&self.src_root).doc_root(&self.doc_root);
        if self.extensions.is_empty() {
            config
        } else {
            config.extensions(self.extensions.iter().cloned())
        }
    }

    fn limits(&self) -> ReadLimits {
        ReadLimits {
            max_line_chars: self.max_line_chars,
            ..ReadLimits::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Log to stderr; stdout carries the protocol
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!(
        src_root = %args.src_root.display(),
        doc_root = %args.doc_root.display(),
        "Starting Whelk MCP server"
    );

    let server = WhelkServer::from_config(args.source_config(), args.limits())?;

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("Failed to start MCP service: {}", e);
        })?;

    tracing::info!("Whelk MCP server running");

    service.waiting().await?;

    tracing::info!("Whelk MCP server shutting down");

    Ok(())
}
