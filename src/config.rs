use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub csv_path: PathBuf,
    pub max_body_size: usize,
    pub cors_origins: CorsOrigins,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// `*` (or an empty value) allows every origin, anything else is a
    /// comma-separated list of exact origins.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("COLLECTOR_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid COLLECTOR_HOST: {e}"))?;

        let port: u16 = env_or("COLLECTOR_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid COLLECTOR_PORT: {e}"))?;

        let csv_path = PathBuf::from(env_or("COLLECTOR_CSV_PATH", "submissions.csv"));
        if csv_path.as_os_str().is_empty() {
            return Err("Invalid COLLECTOR_CSV_PATH: must not be empty".to_string());
        }

        let max_body_size: usize = env_or("COLLECTOR_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid COLLECTOR_MAX_BODY_SIZE: {e}"))?;

        let cors_origins = CorsOrigins::parse(&env_or("COLLECTOR_CORS_ORIGINS", "*"));

        let log_level = env_or("COLLECTOR_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            csv_path,
            max_body_size,
            cors_origins,
            log_level,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
