use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    /// Directory acting as the blob container.
    pub root: String,
    /// Base URL prefixed to blob names when building public URIs.
    pub base_uri: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub storage: Storage,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Try to load from settings.toml (optional for deployment)
        let config_file_name = "settings.toml";

        // Check in current directory
        let current_dir_path = PathBuf::from(config_file_name);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // Check in trailbook-server directory (for development)
        let dev_path = PathBuf::from("trailbook-server").join(config_file_name);
        if dev_path.exists() {
            builder = builder.add_source(File::from(dev_path).required(false));
        }

        // 2. Override with environment variables (highest priority)
        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "trailbook.db")?
            .set_default("storage.root", "trailbook-images")?
            .set_default("storage.base_uri", "http://localhost:3000/api/images")?;

        if let Ok(db_path) = std::env::var("DATABASE_PATH") {
            builder = builder.set_override("database.path", db_path)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(root) = std::env::var("STORAGE_ROOT") {
            builder = builder.set_override("storage.root", root)?;
        }
        if let Ok(base_uri) = std::env::var("STORAGE_BASE_URI") {
            builder = builder.set_override("storage.base_uri", base_uri)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}
