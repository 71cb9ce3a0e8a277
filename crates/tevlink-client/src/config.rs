use std::time::Duration;

use tevlink_transport::{TcpTransport, DEFAULT_HOST, DEFAULT_PORT};

use crate::error::{ClientError, Result};

/// Connection settings for a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Viewer host name or IP literal.
    pub host: String,
    /// Viewer TCP port.
    pub port: u16,
    /// Connect on the first command instead of failing with `NotConnected`.
    pub auto_connect: bool,
    /// Upper bound on each connection attempt.
    pub connect_timeout: Option<Duration>,
    /// Upper bound on a blocked send.
    pub write_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            auto_connect: false,
            connect_timeout: Some(Duration::from_secs(5)),
            write_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Parse `host`, `host:port`, `[v6]` or `[v6]:port`.
    ///
    /// A bare IPv6 literal without brackets is taken as a host with the default port.
    pub fn from_address(addr: &str) -> Result<Self> {
        let addr = addr.trim();
        let invalid = || ClientError::InvalidAddress(addr.to_string());

        let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            match tail {
                "" => (host, None),
                tail => (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
            }
        } else {
            match addr.split_once(':') {
                Some((host, port)) if !port.contains(':') => (host, Some(port)),
                _ => (addr, None),
            }
        };

        if host.is_empty() {
            return Err(invalid());
        }
        let port = match port {
            Some(port) => port.parse::<u16>().map_err(|_| invalid())?,
            None => DEFAULT_PORT,
        };
        Ok(Self::new(host, port))
    }

    pub fn with_auto_connect(mut self, auto_connect: bool) -> Self {
        self.auto_connect = auto_connect;
        self
    }

    /// Build the TCP transport these settings describe.
    pub fn transport(&self) -> TcpTransport {
        TcpTransport::new(self.host.clone(), self.port)
            .with_connect_timeout(self.connect_timeout)
            .with_write_timeout(self.write_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_local_viewer() {
        let config = ClientConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 14158);
        assert!(!config.auto_connect);
        assert_eq!(config.transport().addr(), "127.0.0.1:14158");
    }

    #[test]
    fn parses_address_forms() {
        let cases = [
            ("localhost", "localhost", 14158),
            ("10.0.0.2:9000", "10.0.0.2", 9000),
            ("[::1]", "::1", 14158),
            ("[::1]:7000", "::1", 7000),
            ("::1", "::1", 14158),
            ("  viewer:1 ", "viewer", 1),
        ];
        for (input, host, port) in cases {
            let config = ClientConfig::from_address(input).unwrap();
            assert_eq!((config.host.as_str(), config.port), (host, port), "{input}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for input in ["", ":80", "[::1", "[::1]80", "host:99999", "host:port"] {
            let err = ClientConfig::from_address(input).unwrap_err();
            assert!(matches!(err, ClientError::InvalidAddress(_)), "{input}");
        }
    }
}
