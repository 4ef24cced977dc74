use chart_mcp::{ChartToolServer, ServerConfig};
use rmcp::ServiceExt;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = chart_mcp::telemetry::init_default_tracing();

    let config = ServerConfig::load()?;
    let server = ChartToolServer::from_config(&config)?;
    info!(
        output_dir = %config.output_dir.display(),
        dpi = config.dpi,
        "chart tool server listening on stdio"
    );

    let service = server
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| eprintln!("MCP server error: {e}"))?;
    service.waiting().await?;
    Ok(())
}
