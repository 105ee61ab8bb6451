use crate::Result;
use crate::discovery::{
    AlpacaPort, DEFAULT_DISCOVERY_PORT, DISCOVERY_ADDR_V6, DISCOVERY_MSG, bind_socket,
};
use indexmap::IndexSet;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

/// Alpaca discovery client.
#[derive(Debug, Clone, Copy)]
pub struct Client {
    /// Number of discovery requests to send.
    ///
    /// Defaults to 2.
    pub num_requests: usize,
    /// Time to wait after each response for more responses.
    ///
    /// Defaults to 2 seconds.
    pub timeout: Duration,
    /// Whether to send IPv6 discovery requests.
    ///
    /// Disabled by default as all Alpaca devices should support IPv4.
    pub include_ipv6: bool,
    /// Discovery port to send requests to.
    ///
    /// Defaults to 32227.
    pub discovery_port: u16,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a discovery client with default settings.
    pub const fn new() -> Self {
        Self {
            num_requests: 2,
            timeout: Duration::from_secs(2),
            include_ipv6: false,
            discovery_port: DEFAULT_DISCOVERY_PORT,
        }
    }

    /// Discover Alpaca servers on the local network.
    ///
    /// Blocks until no response has arrived for [`timeout`](Self::timeout)
    /// after the last request. Addresses are returned once each, in the order
    /// they were first seen.
    pub fn discover_addrs(&self) -> Result<Vec<SocketAddr>> {
        let mut targets = vec![SocketAddr::from((Ipv4Addr::BROADCAST, self.discovery_port))];
        if self.include_ipv6 {
            targets.push(SocketAddr::from((DISCOVERY_ADDR_V6, self.discovery_port)));
        }
        self.discover_via(&targets)
    }

    #[tracing::instrument(level = "debug", skip(self), fields(num_requests = self.num_requests, timeout = ?self.timeout))]
    pub(crate) fn discover_via(&self, targets: &[SocketAddr]) -> Result<Vec<SocketAddr>> {
        let dual_stack = targets.iter().any(SocketAddr::is_ipv6);
        let socket = bind_socket(if dual_stack {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        })?;
        socket.set_read_timeout(Some(self.timeout))?;

        let mut found = IndexSet::new();
        // "{"AlpacaPort":12345}" plus room for whitespace
        let mut buf = [0; 64];

        for request_num in 0..self.num_requests {
            for &target in targets {
                let target = match target {
                    SocketAddr::V4(v4) if dual_stack => {
                        SocketAddr::new(v4.ip().to_ipv6_mapped().into(), v4.port())
                    }
                    _ => target,
                };
                tracing::debug!(request_num, %target, "Sending discovery request");
                let _ = socket.send_to(DISCOVERY_MSG, target)?;
            }

            loop {
                let (len, src) = match socket.recv_from(&mut buf) {
                    Ok(received) => received,
                    Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                        tracing::debug!(request_num, "No more discovery responses");
                        break;
                    }
                    Err(err) => return Err(err.into()),
                };
                match serde_json::from_slice::<AlpacaPort>(&buf[..len]) {
                    Ok(AlpacaPort { alpaca_port }) => {
                        let addr = SocketAddr::new(IpAddr::to_canonical(&src.ip()), alpaca_port);
                        tracing::debug!(%addr, "Received discovery response");
                        let _ = found.insert(addr);
                    }
                    Err(err) => {
                        tracing::warn!(%src, %err, "Received unknown discovery datagram");
                    }
                }
            }
        }

        Ok(found.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Client;
    use crate::discovery::DISCOVERY_MSG;
    use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
    use std::thread;
    use std::time::Duration;

    /// Answers `requests` discovery requests with the given datagrams.
    fn spawn_responder(
        requests: usize,
        replies: &'static [&'static [u8]],
    ) -> eyre::Result<(SocketAddr, thread::JoinHandle<eyre::Result<()>>)> {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
        let addr = socket.local_addr()?;
        let handle = thread::spawn(move || {
            let mut buf = [0; 64];
            for _ in 0..requests {
                let (len, src) = socket.recv_from(&mut buf)?;
                eyre::ensure!(&buf[..len] == DISCOVERY_MSG, "unexpected request");
                for reply in replies {
                    let _ = socket.send_to(reply, src)?;
                }
            }
            Ok(())
        });
        Ok((addr, handle))
    }

    #[test]
    fn defaults() {
        let client = Client::default();
        assert_eq!(client.num_requests, 2);
        assert_eq!(client.timeout, Duration::from_secs(2));
        assert!(!client.include_ipv6);
        assert_eq!(client.discovery_port, 32227);
    }

    #[test]
    fn deduplicates_in_first_seen_order() -> eyre::Result<()> {
        let (responder, handle) = spawn_responder(
            2,
            &[
                br#"{"AlpacaPort":11112}"#,
                b"not a discovery response",
                br#"{ "AlpacaPort": 11111 }"#,
            ],
        )?;

        let client = Client {
            timeout: Duration::from_millis(300),
            ..Client::new()
        };
        let addrs = client.discover_via(&[responder])?;

        assert_eq!(
            addrs,
            [
                SocketAddr::from((Ipv4Addr::LOCALHOST, 11112)),
                SocketAddr::from((Ipv4Addr::LOCALHOST, 11111)),
            ]
        );
        handle
            .join()
            .map_err(|_| eyre::eyre!("responder panicked"))??;
        Ok(())
    }

    #[test]
    fn silence_yields_nothing() -> eyre::Result<()> {
        let (responder, handle) = spawn_responder(1, &[])?;
        let client = Client {
            num_requests: 1,
            timeout: Duration::from_millis(100),
            ..Client::new()
        };
        assert!(client.discover_via(&[responder])?.is_empty());
        handle
            .join()
            .map_err(|_| eyre::eyre!("responder panicked"))??;
        Ok(())
    }
}
