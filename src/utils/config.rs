use once_cell::sync::Lazy;
use std::env;
use std::net::SocketAddr;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::new);

pub struct Config {
    pub host: [u8; 4],
    pub port: u16,
}

impl Config {
    fn new() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);
        Self {
            host: [127, 0, 0, 1],
            port,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}
