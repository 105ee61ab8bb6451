use super::ClientIdentity;
use crate::api::DeviceType;
use std::fmt;
use std::sync::Arc;

/// Transport scheme of an Alpaca server.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain HTTP.
    #[default]
    Http,
    /// HTTP over TLS.
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "http",
            Self::Https => "https",
        })
    }
}

/// One addressable device endpoint.
///
/// Sessions are immutable once built. The only state they share with other
/// sessions is the [`ClientIdentity`].
#[derive(Debug, Clone)]
pub struct DeviceSession {
    scheme: Scheme,
    address: String,
    api_version: u32,
    device_type: DeviceType,
    device_number: u32,
    identity: Arc<ClientIdentity>,
}

impl DeviceSession {
    /// Create a session for device `device_number` of `device_type` on the
    /// server at `address` (`host:port`).
    pub fn new(
        scheme: Scheme,
        address: impl Into<String>,
        api_version: u32,
        device_type: DeviceType,
        device_number: u32,
        identity: Arc<ClientIdentity>,
    ) -> Self {
        Self {
            scheme,
            address: address.into(),
            api_version,
            device_type,
            device_number,
            identity,
        }
    }

    /// Transport scheme.
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Server `host:port`.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Alpaca API version used in URLs.
    pub const fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Device type tag.
    pub const fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Zero-based device index on the server.
    pub const fn device_number(&self) -> u32 {
        self.device_number
    }

    /// Identity shared with every other session of the same client.
    pub const fn identity(&self) -> &Arc<ClientIdentity> {
        &self.identity
    }

    /// `{scheme}://{address}/api/v{api_version}/{device_type}/{device_number}/`
    pub fn base_url(&self) -> String {
        format!(
            "{scheme}://{address}/api/v{api_version}/{device_type}/{device_number}/",
            scheme = self.scheme,
            address = self.address,
            api_version = self.api_version,
            device_type = self.device_type,
            device_number = self.device_number,
        )
    }

    /// Absolute URL of a device operation.
    pub fn operation_url(&self, path: &str) -> String {
        let mut url = self.base_url();
        url.push_str(path);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceSession, Scheme};
    use crate::api::DeviceType;
    use crate::client::ClientIdentity;
    use std::sync::Arc;

    #[test]
    fn operation_url_layout() {
        let session = DeviceSession::new(
            Scheme::Https,
            "10.0.0.5:11111",
            1,
            DeviceType::FilterWheel,
            2,
            Arc::new(ClientIdentity::with_client_id(7)),
        );
        assert_eq!(
            session.operation_url("position"),
            "https://10.0.0.5:11111/api/v1/filterwheel/2/position"
        );
    }

    #[test]
    fn sessions_share_identity() {
        let identity = Arc::new(ClientIdentity::new());
        let camera = DeviceSession::new(
            Scheme::Http,
            "localhost:80",
            1,
            DeviceType::Camera,
            0,
            Arc::clone(&identity),
        );
        let dome = DeviceSession::new(
            Scheme::Http,
            "localhost:80",
            1,
            DeviceType::Dome,
            0,
            Arc::clone(&identity),
        );
        assert!(Arc::ptr_eq(camera.identity(), dome.identity()));
        assert_eq!(camera.identity().client_id(), dome.identity().client_id());
    }
}
