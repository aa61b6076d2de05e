use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend_type: BackendType,
    pub redis_url: Option<String>,
    pub redis_username: Option<String>,
    pub redis_password: Option<String>,
    pub redis_db: Option<i64>,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub sweep_interval_secs: u64,
    pub sample_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    Memory,
    Redis,
    Postgres,
}

impl Config {
    pub fn from_env() -> Self {
        let backend_type = env::var("BACKEND_TYPE")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase();

        let backend_type = match backend_type.as_str() {
            "redis" => BackendType::Redis,
            "postgres" => BackendType::Postgres,
            _ => BackendType::Memory,
        };

        let redis_url = if backend_type == BackendType::Redis {
            Some(env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()))
        } else {
            None
        };

        let redis_username = env::var("REDIS_USERNAME").ok();
        let redis_password = env::var("REDIS_PASSWORD").ok();
        let redis_db = env::var("REDIS_DB")
            .ok()
            .and_then(|s| s.parse::<i64>().ok());

        let database_url = if backend_type == BackendType::Postgres {
            Some(
                env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/postgres".to_string()),
            )
        } else {
            None
        };

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let sweep_interval_secs = env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        let sample_interval_secs = env::var("SAMPLE_INTERVAL_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        Self {
            backend_type,
            redis_url,
            redis_username,
            redis_password,
            redis_db,
            database_url,
            database_max_connections,
            server_host,
            server_port,
            sweep_interval_secs,
            sample_interval_secs,
        }
    }
}
