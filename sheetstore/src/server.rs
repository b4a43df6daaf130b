// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::Result;
use log::error;

use crate::config::Configuration;
use crate::context::Context;
use crate::db::{connection_pool, create_database, run_pending_migrations, Pool, SqlStore};
use crate::http::http_service;

/// Makes sure database is created and migrated before returning connection
/// pool.
async fn initialize_db(config: &Configuration) -> Result<Pool> {
    // Create database when not existing
    create_database(&config.database_url).await?;

    // Create connection pool
    let pool = connection_pool(&config.database_url, config.database_max_connections).await?;

    // Run pending migrations
    run_pending_migrations(&pool).await?;

    Ok(pool)
}

/// Main runtime managing the sheet record service process.
///
/// Can be used to embed the service within other applications: `start` brings
/// up storage and the HTTP API, `shutdown` tears everything down again.
#[allow(missing_debug_implementations)]
pub struct SheetServer {
    pool: Pool,
    shutdown: triggered::Trigger,
    exited: triggered::Listener,
}

impl SheetServer {
    /// Start the sheet record service with your configuration.
    pub async fn start(config: Configuration) -> Self {
        // Initialize database and get connection pool
        let pool = initialize_db(&config)
            .await
            .expect("Could not initialize database");

        // Prepare storage using connection pool
        let store = SqlStore::new(pool.clone());

        // Create shared context between services
        let context = Context::new(store, config);

        let (shutdown, signal) = triggered::trigger();
        let (exit, exited) = triggered::trigger();

        // Start HTTP server with the sheet record API
        tokio::spawn(async move {
            if let Err(err) = http_service(context, signal).await {
                error!("HTTP service failed: {}", err);
            }

            exit.trigger();
        });

        Self {
            pool,
            shutdown,
            exited,
        }
    }

    /// This future resolves when the HTTP service stopped.
    ///
    /// It can be used to exit the application as a stopped service usually
    /// means that something went wrong.
    pub async fn on_exit(&self) {
        self.exited.clone().await;
    }

    /// Close the running service and wait until it is fully shut down.
    pub async fn shutdown(self) {
        // Signal the HTTP server to stop and wait for it
        self.shutdown.trigger();
        self.exited.await;

        // Close connection pool
        self.pool.close().await;
    }
}
