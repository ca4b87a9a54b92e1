use clap::Parser;
use pinhole_shortener::service::{DEFAULT_MAX_GENERATE_ATTEMPTS, DEFAULT_VALIDITY_MINUTES};
use pinhole_telemetry::LogFormat;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const HOST_ENV: &str = "PINHOLE_GATEWAY_HOST";
pub const PORT_ENV: &str = "PINHOLE_GATEWAY_PORT";
pub const LISTEN_ADDR_ENV: &str = "PINHOLE_GATEWAY_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "PINHOLE_GATEWAY_PUBLIC_BASE_URL";
pub const LOG_COLLECTOR_URL_ENV: &str = "PINHOLE_LOG_COLLECTOR_URL";
pub const DEFAULT_VALIDITY_ENV: &str = "PINHOLE_DEFAULT_VALIDITY_MINUTES";
pub const MAX_GENERATE_ATTEMPTS_ENV: &str = "PINHOLE_MAX_GENERATE_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "PINHOLE_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "PINHOLE_OTLP_ENDPOINT";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_COLLECTOR_URL: &str = "http://localhost:3000";

#[derive(Debug, Parser)]
#[command(name = "pinhole-gateway")]
pub struct CLI {
    /// Host name used in generated short links.
    #[arg(long, env = HOST_ENV, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = PORT_ENV, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Socket to bind; defaults to all interfaces on `--port`.
    #[arg(long, env = LISTEN_ADDR_ENV)]
    pub listen_addr: Option<SocketAddr>,

    /// Overrides the `http://<host>:<port>` prefix of short links.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    #[arg(long, env = LOG_COLLECTOR_URL_ENV, default_value = DEFAULT_LOG_COLLECTOR_URL)]
    pub log_collector_url: String,

    /// Keep audit events local instead of relaying them to the collector.
    #[arg(long)]
    pub no_log_relay: bool,

    #[arg(long, env = DEFAULT_VALIDITY_ENV, default_value_t = DEFAULT_VALIDITY_MINUTES)]
    pub default_validity_minutes: u32,

    #[arg(long, env = MAX_GENERATE_ATTEMPTS_ENV, default_value_t = DEFAULT_MAX_GENERATE_ATTEMPTS)]
    pub max_generate_attempts: usize,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
            .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port))
    }

    pub fn public_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}
