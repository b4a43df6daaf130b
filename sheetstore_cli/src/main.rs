// SPDX-License-Identifier: AGPL-3.0-or-later

mod config;

use log::info;
use sheetstore::SheetServer;

use crate::config::load_config;

#[tokio::main]
async fn main() {
    env_logger::init();

    // Load configuration from .toml file, environment variables and command
    // line arguments
    let (config_file_path, config) = load_config().expect("Could not load configuration");

    match &config_file_path {
        Some(path) => info!("Loading config file from {}", path.display()),
        None => info!("No config file provided"),
    };
    info!(
        "Serving sheet records on http://localhost:{}/sheets",
        config.http_port
    );

    // Start sheet record service in async runtime
    let server = SheetServer::start(config).await;

    // Run this until [CTRL] + [C] got pressed or something went wrong
    tokio::select! {
        _ = tokio::signal::ctrl_c() => (),
        _ = server.on_exit() => (),
    }

    // Wait until all tasks are gracefully shut down and exit
    server.shutdown().await;
}
