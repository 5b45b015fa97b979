use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{Error, InternalResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NornConfig {
    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Files run through `!load` at startup, in order
    #[serde(default)]
    pub preload: Vec<String>,
}

impl NornConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        from_file(path)
    }

    pub fn from_str(s: &str) -> InternalResult<Self> {
        from_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_console_port")]
    pub port: u16,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_console_port(),
        }
    }
}

impl ConsoleConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
        }
    }
}

impl HttpConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that `!save`/`!load` file names resolve against
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::Config(format!("Failed to open config file {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

// defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_console_port() -> u16 {
    4444
}

fn default_http_port() -> u16 {
    5021
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
