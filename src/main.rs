//! NutriFit
//!
//! An MCP server for fitness and nutrition tracking.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutrifit::build_info;
use nutrifit::config::Config;
use nutrifit::context::AppContext;
use nutrifit::mcp::NutriFitService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrifit=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    eprintln!("Database path: {}", config.database_path.display());
    eprintln!(
        "Calorie bounds: {}-{} kcal",
        config.min_calorie_target, config.max_calorie_target
    );

    // Open the database and run migrations
    let ctx = AppContext::open(config)?;

    // Create the NutriFit service
    let service = NutriFitService::new(ctx);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
