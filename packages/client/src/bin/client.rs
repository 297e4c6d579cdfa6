//! Terminal watch party client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-client -- --create --nickname alice
//! ```

use clap::Parser;
use watchparty_client::ClientConfig;
use watchparty_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ClientConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = watchparty_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
