use std::error::Error;

use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    ai_llm_service::telemetry::init("info")?;
    info!(version = env!("CARGO_PKG_VERSION"), "devdoc-backend starting");

    api::start().await?;

    Ok(())
}
