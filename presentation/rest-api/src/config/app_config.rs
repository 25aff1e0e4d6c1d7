use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use poem::middleware::Cors;

use super::{cors_config, database_config::parse_var, firebase_config::FirebaseConfig};

const DEFAULT_IP: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8080;

pub struct AppConfig {
    /// Listener address
    pub listen: SocketAddr,
    /// Base URL advertised in the OpenAPI document
    pub public_url: String,
    pub cors: Cors,
    pub firebase: FirebaseConfig,
}

impl AppConfig {
    /// Environment variables:
    /// - SERVICE_IP: address to bind (default: 127.0.0.1)
    /// - SERVICE_PORT: port to bind (default: 8080)
    /// - PUBLIC_BASE_URL: URL clients use to reach the API (default: `http://{ip}:{port}`)
    pub fn from_env() -> anyhow::Result<Self> {
        let listen = listen_address(parse_var("SERVICE_IP")?, parse_var("SERVICE_PORT")?);
        Ok(Self {
            listen,
            public_url: public_url(env::var("PUBLIC_BASE_URL").ok(), listen),
            cors: cors_config::init_cors(),
            firebase: FirebaseConfig::from_env()?,
        })
    }
}

fn listen_address(ip: Option<IpAddr>, port: Option<u16>) -> SocketAddr {
    SocketAddr::new(ip.unwrap_or(DEFAULT_IP), port.unwrap_or(DEFAULT_PORT))
}

fn public_url(configured: Option<String>, listen: SocketAddr) -> String {
    match configured {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => format!("http://{listen}"),
    }
}
