use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory banner files are written to and served from.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Request body ceiling; Base64 payloads above this are rejected.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Seconds between orphan sweep runs.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Minimum age before an unreferenced file may be reclaimed.
    #[serde(default = "default_sweep_grace")]
    pub sweep_grace_secs: u64,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_sweep_interval() -> u64 {
    300
}
fn default_sweep_grace() -> u64 {
    3600
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            sweep_interval_secs: default_sweep_interval(),
            sweep_grace_secs: default_sweep_grace(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./bannerhub.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}
