// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Configuration object holding all important variables throughout the
/// application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// URL / connection string to PostgreSQL or SQLite database.
    pub database_url: String,

    /// Maximum number of connections that the database pool should maintain.
    ///
    /// Be mindful of the connection limits for the database as well as other
    /// applications which may want to connect to the same database (or even
    /// multiple instances of the same application in high-availability
    /// deployments).
    pub database_max_connections: u32,

    /// HTTP port, serving the sheet record API (for example hosted under
    /// http://localhost:2020/sheets). Defaults to 2020.
    pub http_port: u16,

    /// Locale used for sheet records created without an explicit one, for
    /// example to translate the first sheet name of a new workbook. Defaults
    /// to "en".
    pub default_locale: Locale,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            database_max_connections: 32,
            http_port: 2020,
            default_locale: Locale::default(),
        }
    }
}
