//! FxHub - WebSocket broadcast hub with exchange-rate lookups.
//!
//! Listens on localhost:8080 until terminated.

use fxhub::HubConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fxhub=info")),
        )
        .init();

    let config = HubConfig::default();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║              FxHub - Broadcast Hub                         ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
    println!("🌐 WebSocket at ws://{}", config.bind_addr());
    println!("   • exchange        - Today's rates");
    println!("   • exchange 1..10  - Rates for the last N days");
    println!("   • anything else   - Chat with everyone connected");
    println!();

    fxhub::server::run(config).await?;

    println!("\n👋 FxHub has exited. Goodbye!");
    Ok(())
}
