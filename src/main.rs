//! # Resource Server - Entry Point
//! src/main.rs
//!
//! Lee la configuración, instala el logging y corre el servidor hasta SIGINT.

use resource_server::config::Config;
use resource_server::logging;
use resource_server::server::Server;

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);
    config.print_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start server");
            std::process::exit(1);
        }
    };

    // SIGINT solo activa el flag; el acceptor lo ve en su siguiente vuelta
    if let Err(e) = signal_hook::flag::register(signal_hook::consts::SIGINT, server.shutdown_handle()) {
        tracing::error!(error = %e, "Cannot register SIGINT handler");
        std::process::exit(1);
    }

    if let Err(e) = server.run() {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
