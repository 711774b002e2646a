use finance_planner_api::{api::start_server, store::build_store_from_env};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8000".to_string())
        .parse()?;

    info!("🚀 Finance Planner API");
    info!("📍 Port: {}", api_port);

    // Select storage backend (postgres if configured, in-memory otherwise)
    let store = build_store_from_env();

    info!("✅ Store initialized");
    info!("📡 Starting API server...");

    start_server(store, api_port).await?;

    Ok(())
}
