//! credential-chain - Resolve declared cloud credential sources
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  credential_chain::cli::run().await;
}
