use std::default::Default;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub fn load() -> Result<Settings, ConfigError> {
    let env = env::var(RUN_MODE_ENV).unwrap_or_else(|_| "development".into());
    Config::builder()
        .add_source(File::with_name(DEFAULT_CFG_PATH))
        .add_source(File::with_name(&format!("config/{}", env)).required(false))
        .add_source(File::with_name(LOCAL_CFG_PATH).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()
}

const DEFAULT_CFG_PATH: &str = "config/default";
const LOCAL_CFG_PATH: &str = "config/local";
const RUN_MODE_ENV: &str = "TABLECAST_SERVER_RUN_MODE";
const ENV_PREFIX: &str = "tablecast_server";

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub logging: Logging,
    pub runtime: Runtime,
    pub server: Server,
}

#[derive(Debug, Deserialize)]
pub struct Logging {
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Logging {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Runtime {
    pub threaded: bool,
    pub worker_threads: usize,
    pub blocking_threads: usize,
    pub thread_name: String,
}

impl Default for Runtime {
    fn default() -> Self {
        let num_cores = num_cpus::get_physical();
        Runtime {
            threaded: true,
            worker_threads: num_cores,
            blocking_threads: num_cores * 4,
            thread_name: "async-worker".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub bind_addr: String,
    /// Directory holding the page, its styles and the compiled ui.
    pub client_files_path: String,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            bind_addr: "127.0.0.1:23948".into(),
            client_files_path: "../ui/build/".into(),
        }
    }
}
