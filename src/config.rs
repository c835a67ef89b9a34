//! Layered settings: built-in defaults, then an optional TOML file, then
//! `TRIVIA_*` environment variables (after `.env` is loaded).

use std::net::SocketAddr;
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:trivia.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Reads `trivia.toml` from the working directory when `file` is not given.
    pub fn load(file: Option<&Path>) -> Result<Settings, ConfigError> {
        dotenv::dotenv().ok();
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("trivia").required(false),
        };
        Self::builder()?
            .add_source(file_source)
            .add_source(Environment::with_prefix("TRIVIA"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))
    }

    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
