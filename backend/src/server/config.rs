//! HTTP server configuration object.

use std::net::SocketAddr;

use dashboard::inbound::http::session_config::SessionSettings;

/// Cookie session settings plus the socket the server binds to.
#[derive(Clone)]
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self { session, bind_addr }
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
