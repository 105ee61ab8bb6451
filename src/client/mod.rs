mod discovery;
pub use discovery::Client as DiscoveryClient;

mod identity;
pub use identity::ClientIdentity;

mod session;
pub use session::{DeviceSession, Scheme};

mod transaction;
pub(crate) use transaction::*;

mod response;
#[cfg_attr(not(feature = "camera"), allow(unused_imports))]
pub(crate) use response::{IMAGE_BYTES_TYPE, Response, is_image_bytes, parse_envelope};

use crate::api::{ConfiguredDevice, DeviceType, ServerInfo, TypedDevice};
use crate::params::{Method, OpaqueParams};
use crate::{ASCOMResult, AlpacaRequestError, Result};
use bytes::Bytes;
use mime::Mime;
use reqwest::blocking::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Statuses treated as a processed request; everything else is a transport failure.
const SUCCESS_STATUSES: std::ops::RangeInclusive<u16> = 200..=203;

/// Issues Alpaca calls and classifies their outcome.
///
/// Holds no per-device state: the [`DeviceSession`] is passed in for each
/// call. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub(crate) struct TransactionClient {
    http: reqwest::blocking::Client,
}

impl TransactionClient {
    pub(crate) fn new(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            http: reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()?,
        })
    }

    /// Perform one device call.
    ///
    /// Captures exactly one transaction ID from the session's identity, sends
    /// the arguments as a query string (`Get`) or form body (`Put`) and blocks
    /// until the response is classified.
    pub(crate) fn invoke<T>(
        &self,
        session: &DeviceSession,
        method: Method,
        path: &str,
        params: &OpaqueParams,
    ) -> Result<T>
    where
        ASCOMResult<T>: Response,
    {
        let request_transaction = session.identity().next_transaction();

        let span = tracing::debug_span!(
            "Alpaca transaction",
            path,
            %method,
            ?params,
            client_id = request_transaction.client_id,
            client_transaction_id = request_transaction.client_transaction_id.get(),
        );
        let _entered = span.enter();

        self.invoke_with_transaction(session, method, path, params, request_transaction)
            .inspect_err(|err| tracing::error!(%err, "Alpaca request failed"))
    }

    fn invoke_with_transaction<T>(
        &self,
        session: &DeviceSession,
        method: Method,
        path: &str,
        params: &OpaqueParams,
        request_transaction: RequestTransaction,
    ) -> Result<T>
    where
        ASCOMResult<T>: Response,
    {
        let url = session.operation_url(path);

        let request = self.http.request(method.into(), &url);
        let envelope = RequestWithTransaction {
            params,
            transaction: request_transaction,
        };
        let request = match method {
            Method::Get => request.query(&envelope),
            Method::Put => request.form(&envelope),
        };
        let request = ASCOMResult::<T>::prepare_reqwest(request);

        let (mime_type, bytes) = self.send(request, &url)?;

        let ResponseWithTransaction {
            transaction: response_transaction,
            response,
        } = ASCOMResult::<T>::from_reqwest(mime_type.as_ref(), &bytes)?;

        tracing::debug!(
            server_transaction_id = ?response_transaction.server_transaction_id,
            "Received response",
        );

        match response_transaction.client_transaction_id {
            Some(received_client_transaction_id)
                if received_client_transaction_id != request_transaction.client_transaction_id =>
            {
                tracing::warn!(
                    sent = request_transaction.client_transaction_id.get(),
                    received = received_client_transaction_id.get(),
                    "ClientTransactionID mismatch",
                );
            }
            _ => {}
        }

        Ok(response?)
    }

    /// Fetch a management endpoint. No transaction IDs are attached.
    fn management<T: 'static + DeserializeOwned>(&self, url: &str) -> Result<T> {
        let span = tracing::debug_span!("Alpaca management request", url);
        let _entered = span.enter();

        let result = self.send(self.http.get(url), url).and_then(|(mime_type, bytes)| {
            Ok(ASCOMResult::<T>::from_reqwest(mime_type.as_ref(), &bytes)?.response?)
        });
        result.inspect_err(|err| tracing::error!(%err, "Alpaca management request failed"))
    }

    /// Send a request and apply the status classification.
    fn send(&self, request: RequestBuilder, url: &str) -> Result<(Option<Mime>, Bytes)> {
        let response = request.send()?;
        let status = response.status();
        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Mime>().ok());
        let bytes = response.bytes()?;

        if !SUCCESS_STATUSES.contains(&status.as_u16()) {
            return Err(AlpacaRequestError::new(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                &String::from_utf8_lossy(&bytes),
                url,
            )
            .into());
        }

        Ok((mime_type, bytes))
    }
}

/// Transaction client bound to one device endpoint.
///
/// Every device facade dereferences to this type, so the operations common
/// to all devices (`name`, `connected`, `action`, ...) are available on each.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    transport: TransactionClient,
    session: DeviceSession,
}

impl DeviceClient {
    /// The endpoint this client talks to.
    pub const fn session(&self) -> &DeviceSession {
        &self.session
    }

    /// Call an arbitrary device operation and decode its `Value`.
    ///
    /// Use `serde_json::Value` to get the value exactly as sent by the server
    /// and `()` for operations that return nothing.
    pub fn invoke<T: 'static + DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &OpaqueParams,
    ) -> Result<T> {
        self.transport.invoke(&self.session, method, path, params)
    }

    pub(crate) fn exec_action<T>(
        &self,
        method: Method,
        path: &str,
        params: OpaqueParams,
    ) -> Result<T>
    where
        ASCOMResult<T>: Response,
    {
        self.transport.invoke(&self.session, method, path, &params)
    }
}

/// Configuration of a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    address: String,
    scheme: Scheme,
    api_version: u32,
    timeout: Option<Duration>,
    identity: Option<Arc<ClientIdentity>>,
}

impl ClientBuilder {
    /// Transport scheme. Defaults to plain HTTP.
    #[must_use]
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Alpaca API version used in device URLs. Defaults to 1.
    #[must_use]
    pub fn api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    /// Transport-level deadline for each HTTP round trip.
    ///
    /// Unset by default, in which case calls block until the server answers.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Share an existing identity, e.g. with another [`Client`].
    #[must_use]
    pub fn identity(mut self, identity: Arc<ClientIdentity>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Create the client.
    pub fn build(self) -> Result<Client> {
        Ok(Client {
            transport: TransactionClient::new(self.timeout)?,
            address: self.address,
            scheme: self.scheme,
            api_version: self.api_version,
            identity: self.identity.unwrap_or_default(),
        })
    }
}

/// Client for one Alpaca server.
#[derive(Debug, Clone)]
pub struct Client {
    transport: TransactionClient,
    address: String,
    scheme: Scheme,
    api_version: u32,
    identity: Arc<ClientIdentity>,
}

impl Client {
    /// Start configuring a client for the server at `address` (`host:port`).
    pub fn builder(address: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            address: address.into(),
            scheme: Scheme::default(),
            api_version: 1,
            timeout: None,
            identity: None,
        }
    }

    /// Client with default settings for the server at `address` (`host:port`).
    pub fn new(address: impl Into<String>) -> Result<Self> {
        Self::builder(address).build()
    }

    /// Client with default settings for a discovered server address.
    pub fn new_from_addr(addr: impl Into<SocketAddr>) -> Result<Self> {
        Self::new(addr.into().to_string())
    }

    /// Identity shared by every device created from this client.
    pub const fn identity(&self) -> &Arc<ClientIdentity> {
        &self.identity
    }

    /// Session for device `device_number` of the given type.
    pub fn device_session(&self, device_type: DeviceType, device_number: u32) -> DeviceSession {
        DeviceSession::new(
            self.scheme,
            self.address.clone(),
            self.api_version,
            device_type,
            device_number,
            Arc::clone(&self.identity),
        )
    }

    /// Untyped client for device `device_number` of the given type.
    pub fn device_client(&self, device_type: DeviceType, device_number: u32) -> DeviceClient {
        DeviceClient {
            transport: self.transport.clone(),
            session: self.device_session(device_type, device_number),
        }
    }

    fn management_url(&self, path: &str) -> String {
        format!(
            "{scheme}://{address}/management/{path}",
            scheme = self.scheme,
            address = self.address,
        )
    }

    /// Alpaca API versions supported by the server.
    pub fn api_versions(&self) -> Result<Vec<u32>> {
        self.transport.management(&self.management_url("apiversions"))
    }

    /// General information about the server.
    pub fn description(&self) -> Result<ServerInfo> {
        self.transport.management(&self.management_url(&format!(
            "v{api_version}/description",
            api_version = self.api_version
        )))
    }

    /// Devices the server exposes.
    pub fn configured_devices(&self) -> Result<Vec<ConfiguredDevice>> {
        self.transport.management(&self.management_url(&format!(
            "v{api_version}/configureddevices",
            api_version = self.api_version
        )))
    }

    /// Typed clients for every configured device.
    ///
    /// Devices whose type is compiled out are skipped.
    pub fn devices(&self) -> Result<Vec<TypedDevice>> {
        Ok(self
            .configured_devices()?
            .into_iter()
            .filter_map(|device| {
                let typed = TypedDevice::new(self, device.device_type, device.device_number);
                if typed.is_none() {
                    tracing::debug!(
                        device_type = %device.device_type,
                        device_number = device.device_number,
                        "Skipping device of a disabled type"
                    );
                }
                typed
            })
            .collect())
    }
}
