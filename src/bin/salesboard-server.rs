/// Salesboard Server
///
/// Serves the interactive sales dashboard over HTTP, with WebSocket
/// re-rendering when the delivery-status selector changes.

use salesboard::config::ServerConfig;
use salesboard::server::run_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // HOST, PORT and SALES_DATA come from the environment
    let config = ServerConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    // Start the server
    run_server(config).await
}
