//! Alpaca discovery protocol: constants and socket setup shared by the discovery client.

use serde::Deserialize;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv6Addr, SocketAddr, UdpSocket};
#[cfg(windows)]
use std::os::windows::prelude::AsRawSocket;

/// IPv6 multicast group Alpaca servers listen on.
pub(crate) const DISCOVERY_ADDR_V6: Ipv6Addr = Ipv6Addr::new(0xff12, 0, 0, 0, 0, 0, 0xa1, 0x9aca);
pub(crate) const DISCOVERY_MSG: &[u8] = b"alpacadiscovery1";
pub(crate) const DEFAULT_DISCOVERY_PORT: u16 = 32227;

/// Discovery response datagram.
#[derive(Debug, Deserialize)]
pub(crate) struct AlpacaPort {
    #[serde(rename = "AlpacaPort")]
    pub(crate) alpaca_port: u16,
}

/// Bind a blocking UDP socket for discovery.
///
/// IPv6 sockets are dual-stack so the IPv4 broadcast can go out of the same socket.
#[tracing::instrument(level = "trace")]
pub(crate) fn bind_socket(addr: SocketAddr) -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    // SIO_UDP_CONNRESET is needed to ignore the occasional "port unreachable" errors
    // on Windows, which otherwise render the socket unusable.
    #[cfg(windows)]
    {
        use windows_sys::Win32::Networking::WinSock::{
            SIO_UDP_CONNRESET, WSAGetLastError, ioctlsocket,
        };

        unsafe {
            #[expect(
                clippy::as_conversions,
                clippy::cast_possible_truncation,
                clippy::cast_possible_wrap
            )]
            match ioctlsocket(socket.as_raw_socket() as _, SIO_UDP_CONNRESET as _, &mut 0) {
                0_i32 => Ok(()),
                _ => Err(WSAGetLastError()),
            }
        }
        .map_err(std::io::Error::from_raw_os_error)?;
    }
    socket.bind(&addr.into())?;
    socket.set_broadcast(true)?;
    Ok(socket.into())
}

#[cfg(test)]
mod tests {
    use super::{AlpacaPort, DISCOVERY_ADDR_V6};

    #[test]
    fn multicast_group() {
        assert_eq!(DISCOVERY_ADDR_V6.to_string(), "ff12::a1:9aca");
        assert!(DISCOVERY_ADDR_V6.is_multicast());
    }

    #[test]
    fn parses_response_with_whitespace() -> eyre::Result<()> {
        let AlpacaPort { alpaca_port } =
            serde_json::from_slice(b"{ \"AlpacaPort\": 11111 }\n")?;
        assert_eq!(alpaca_port, 11111);
        Ok(())
    }

    #[test]
    fn rejects_other_datagrams() {
        assert!(serde_json::from_slice::<AlpacaPort>(b"alpacadiscovery1").is_err());
        assert!(serde_json::from_slice::<AlpacaPort>(br#"{"AlpacaPort": 70000}"#).is_err());
    }
}
