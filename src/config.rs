use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{config_error, Error};

const DEFAULT_OSRM_API_BASE: &str = "https://router.project-osrm.org";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub api_token: Option<String>,
    pub osrm_api_base: String,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads configuration from the process environment, after loading a
    /// `.env` file if one is present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let api_base = env::var("NAVLUN_API_BASE")?;
        let api_token = env::var("NAVLUN_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        let osrm_api_base =
            env::var("OSRM_API_BASE").unwrap_or_else(|_| DEFAULT_OSRM_API_BASE.into());

        let bind_addr = env::var("NAVLUN_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|_| config_error("NAVLUN_BIND_ADDR is not a socket address"))?;

        let request_timeout = match env::var("NAVLUN_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| config_error("NAVLUN_REQUEST_TIMEOUT_SECS is not an integer"))?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token,
            osrm_api_base: osrm_api_base.trim_end_matches('/').to_string(),
            bind_addr,
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}
