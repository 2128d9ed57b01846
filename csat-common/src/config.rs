//! Configuration loading and root folder resolution
//!
//! All service configuration is resolved up front into an explicit
//! `ServerConfig` passed to the service at construction; nothing reads
//! process-wide globals after startup.

use serde::Deserialize;
use std::path::PathBuf;

use crate::{Error, Result};

/// Default bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default service port
pub const DEFAULT_PORT: u16 = 5780;

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "csat.db";

/// CSV backstop file name inside the root folder
pub const CSV_FILE: &str = "survey_responses.csv";

/// Fully-resolved service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Folder holding the database file and the CSV backstop
    pub root_folder: PathBuf,
    /// Read/export credential for the admin endpoints; empty disables them
    pub admin_password: String,
    /// Second, distinct credential required for bulk deletion
    pub delete_password: String,
}

impl ServerConfig {
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.root_folder.join(CSV_FILE)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve configuration with priority order:
    /// 1. Command-line argument (passed in by the caller, highest priority)
    /// 2. Environment variable
    /// 3. TOML config file
    /// 4. Compiled default
    pub fn resolve(
        cli_root: Option<&str>,
        cli_port: Option<u16>,
        cli_admin_password: Option<&str>,
        cli_delete_password: Option<&str>,
    ) -> Result<ServerConfig> {
        let file = load_config_file().unwrap_or_default();

        let root_folder = cli_root
            .map(PathBuf::from)
            .or_else(|| std::env::var("CSAT_ROOT_FOLDER").ok().map(PathBuf::from))
            .or_else(|| file.root_folder.clone().map(PathBuf::from))
            .unwrap_or_else(default_root_folder);

        let port = cli_port
            .or_else(|| {
                std::env::var("CSAT_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let admin_password = cli_admin_password
            .map(String::from)
            .or_else(|| std::env::var("CSAT_ADMIN_PASSWORD").ok())
            .or_else(|| file.admin_password.clone())
            .unwrap_or_default();

        let delete_password = cli_delete_password
            .map(String::from)
            .or_else(|| std::env::var("CSAT_DELETE_PASSWORD").ok())
            .or_else(|| file.delete_password.clone())
            .unwrap_or_default();

        Ok(ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port,
            root_folder,
            admin_password,
            delete_password,
        })
    }

    /// Create the root folder if it does not exist yet
    pub fn ensure_root_folder(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }
}

/// Optional keys read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    root_folder: Option<String>,
    port: Option<u16>,
    admin_password: Option<String>,
    delete_password: Option<String>,
}

/// Load the config file if one exists; a missing or malformed file is not
/// an error, it just contributes nothing
fn load_config_file() -> Option<FileConfig> {
    let path = config_file_path().ok()?;
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
            None
        }
    }
}

/// Platform config file location: ~/.config/csat/config.toml (or the OS
/// equivalent), falling back to /etc/csat/config.toml on Linux
fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("csat").join("config.toml")) {
        if path.exists() {
            return Ok(path);
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/csat/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }
    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("csat"))
        .unwrap_or_else(|| PathBuf::from("./csat_data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("CSAT_ROOT_FOLDER");
        std::env::remove_var("CSAT_PORT");
        std::env::remove_var("CSAT_ADMIN_PASSWORD");
        std::env::remove_var("CSAT_DELETE_PASSWORD");
    }

    #[test]
    #[serial]
    fn cli_argument_wins_over_environment() {
        clear_env();
        std::env::set_var("CSAT_ROOT_FOLDER", "/tmp/from-env");
        let config = ServerConfig::resolve(Some("/tmp/from-cli"), None, None, None).unwrap();
        assert_eq!(config.root_folder, PathBuf::from("/tmp/from-cli"));
        clear_env();
    }

    #[test]
    #[serial]
    fn environment_used_when_no_cli_argument() {
        clear_env();
        std::env::set_var("CSAT_ROOT_FOLDER", "/tmp/from-env");
        std::env::set_var("CSAT_ADMIN_PASSWORD", "hunter2");
        let config = ServerConfig::resolve(None, None, None, None).unwrap();
        assert_eq!(config.root_folder, PathBuf::from("/tmp/from-env"));
        assert_eq!(config.admin_password, "hunter2");
        clear_env();
    }

    #[test]
    #[serial]
    fn defaults_applied_last() {
        clear_env();
        let config = ServerConfig::resolve(Some("/tmp/csat-test"), None, None, None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.admin_password.is_empty());
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/csat-test").join(DATABASE_FILE)
        );
        assert_eq!(
            config.csv_path(),
            PathBuf::from("/tmp/csat-test").join(CSV_FILE)
        );
    }

    #[test]
    #[serial]
    fn port_parsed_from_environment() {
        clear_env();
        std::env::set_var("CSAT_PORT", "9090");
        let config = ServerConfig::resolve(Some("/tmp/csat-test"), None, None, None).unwrap();
        assert_eq!(config.port, 9090);
        clear_env();
    }
}
