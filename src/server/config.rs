use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;

use crate::core::params::PipelineParams;
use crate::error::{Error, Result};

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Origins allowed to call `/process-image` from a browser
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub params: PipelineParams,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            params: PipelineParams::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Origins as header values, rejecting anything that is not a valid header.
    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| Error::InvalidArgument {
                    arg: "allowed_origins",
                    value: origin.clone(),
                })
            })
            .collect()
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
