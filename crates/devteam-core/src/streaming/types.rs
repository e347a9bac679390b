use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::RawEvent;

/// Where the push channel listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEndpoint {
    /// `host:port`
    Tcp(String),
    Unix(PathBuf),
    /// `ws://host:port/path`, the backend's own event socket
    Ws(String),
}

impl FromStr for FeedEndpoint {
    type Err = String;

    /// `ws://host:port/ws/events`, `unix:/run/devteam.sock`, `tcp://host:port`
    /// or plain `host:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("wss://") {
            return Err(format!("TLS feeds are not supported: {s}"));
        }
        if let Some(rest) = s.strip_prefix("ws://") {
            if rest.is_empty() || rest.starts_with('/') {
                return Err(format!("missing host in feed url: {s}"));
            }
            return Ok(FeedEndpoint::Ws(s.to_string()));
        }
        if let Some(path) = s.strip_prefix("unix:") {
            if path.is_empty() {
                return Err("empty unix socket path".to_string());
            }
            return Ok(FeedEndpoint::Unix(PathBuf::from(path)));
        }
        let addr = s.strip_prefix("tcp://").unwrap_or(s);
        match addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(FeedEndpoint::Tcp(addr.to_string()))
            }
            _ => Err(format!("invalid feed endpoint: {s}")),
        }
    }
}

impl fmt::Display for FeedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedEndpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
            FeedEndpoint::Unix(path) => write!(f, "unix:{}", path.display()),
            FeedEndpoint::Ws(url) => f.write_str(url),
        }
    }
}

/// Connector lifecycle: Connecting -> Connected -> Disconnected -> Connecting ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Connecting,
    Connected,
    Disconnected,
}

/// Item delivered by a feed subscription, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    Status(FeedStatus),
    Event(RawEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parsing() {
        assert_eq!(
            "127.0.0.1:8765".parse::<FeedEndpoint>(),
            Ok(FeedEndpoint::Tcp("127.0.0.1:8765".into()))
        );
        assert_eq!(
            "tcp://localhost:9000".parse::<FeedEndpoint>(),
            Ok(FeedEndpoint::Tcp("localhost:9000".into()))
        );
        assert_eq!(
            "unix:/tmp/devteam-events.sock".parse::<FeedEndpoint>(),
            Ok(FeedEndpoint::Unix(PathBuf::from("/tmp/devteam-events.sock")))
        );
        assert!("localhost".parse::<FeedEndpoint>().is_err());
        assert!("unix:".parse::<FeedEndpoint>().is_err());
        assert!(":80".parse::<FeedEndpoint>().is_err());
    }

    #[test]
    fn test_websocket_endpoint_parsing() {
        assert_eq!(
            "ws://127.0.0.1:8000/ws/events".parse::<FeedEndpoint>(),
            Ok(FeedEndpoint::Ws("ws://127.0.0.1:8000/ws/events".into()))
        );
        assert!("wss://example.com/ws/events".parse::<FeedEndpoint>().is_err());
        assert!("ws:///ws/events".parse::<FeedEndpoint>().is_err());

        let endpoint = FeedEndpoint::Ws("ws://localhost:8000/ws/events".into());
        assert_eq!(endpoint.to_string().parse::<FeedEndpoint>(), Ok(endpoint));
    }

    #[test]
    fn test_endpoint_display_round_trips() {
        let endpoint = FeedEndpoint::Unix(PathBuf::from("/tmp/feed.sock"));
        assert_eq!(endpoint.to_string().parse::<FeedEndpoint>(), Ok(endpoint));
    }
}
