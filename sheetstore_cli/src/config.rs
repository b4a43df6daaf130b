// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::Serialize;
use sheetstore::Configuration;

/// Name of the optional configuration file looked up in common locations.
const CONFIG_FILE_NAME: &str = "config.toml";

type ConfigFilePath = Option<PathBuf>;

/// Get configuration from 1. .toml file, 2. environment variables and
/// 3. command line arguments (in that order, meaning that later configuration
/// sources take precedence over the earlier ones).
pub fn load_config() -> Result<(ConfigFilePath, Configuration)> {
    // Parse command line arguments first to get optional config file path
    let cli = Cli::parse();

    // Determine if a config file path was provided or if we should look for
    // it in common locations
    let config_file_path: ConfigFilePath = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file '{}' does not exist", path.display());
            }

            Some(path.clone())
        }
        None => try_determine_config_file_path(),
    };

    let mut figment = Figment::from(Serialized::defaults(Configuration::default()));
    if let Some(path) = &config_file_path {
        figment = figment.merge(Toml::file(path));
    }

    let config = figment
        .merge(Env::prefixed("SHEETSTORE_"))
        .merge(Serialized::defaults(cli))
        .extract()?;

    Ok((config_file_path, config))
}

/// Configuration derived from command line arguments.
///
/// All arguments are optional and don't get serialized to Figment when
/// they're None. This is to assure that default values do not overwrite all
/// previous settings, especially when they haven't been set.
#[derive(Parser, Serialize, Debug)]
#[command(
    name = "sheetstore",
    about = "Storage service for spreadsheet sheet records",
    long_about = None,
    version
)]
struct Cli {
    /// Path to an optional "config.toml" file for further configuration.
    ///
    /// When not set the program will try to find a `config.toml` file in the
    /// same folder the program is executed in and otherwise in the regarding
    /// operation systems XDG config directory
    /// ("$HOME/.config/sheetstore/config.toml" on Linux).
    #[arg(short = 'c', long, value_name = "PATH")]
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PathBuf>,

    /// URL / connection string to PostgreSQL or SQLite database. Defaults to
    /// an in-memory SQLite database.
    ///
    /// WARNING: By default your sheets will not be persisted after shutdown.
    /// Set a database connection url for production settings to not loose
    /// data.
    #[arg(short = 'd', long, value_name = "CONNECTION_STRING")]
    #[serde(skip_serializing_if = "Option::is_none")]
    database_url: Option<String>,

    /// Maximum number of connections that the database pool should maintain.
    #[arg(long, value_name = "COUNT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    database_max_connections: Option<u32>,

    /// HTTP port serving the sheet record API. Defaults to 2020.
    #[arg(short = 'p', long, value_name = "PORT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    http_port: Option<u16>,

    /// Locale used for sheet records created without an explicit one, for
    /// example "fr" or "pt-BR". Defaults to "en".
    #[arg(short = 'l', long, value_name = "LOCALE")]
    #[serde(skip_serializing_if = "Option::is_none")]
    default_locale: Option<String>,
}

/// Checks for a config file in current folder and XDG config directory,
/// returns its path when found.
fn try_determine_config_file_path() -> ConfigFilePath {
    let current_dir_path = PathBuf::from(CONFIG_FILE_NAME);
    if current_dir_path.exists() {
        return Some(current_dir_path);
    }

    ProjectDirs::from("", "", "sheetstore")
        .map(|project_dirs| project_dirs.config_dir().join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
