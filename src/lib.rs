/*!
Blocking Rust client for the [ASCOM Alpaca](https://ascom-standards.org/api/) REST API.

## Usage

Create a [`Client`] for a known server, or find servers on the local network with
[`DiscoveryClient`]:

```no_run
use ascom_alpaca_client::{Client, DiscoveryClient};

# fn main() -> eyre::Result<()> {
for addr in DiscoveryClient::new().discover_addrs()? {
    let client = Client::new_from_addr(addr)?;

    for device in client.devices()? {
        println!("{}: {}", device.device_type(), device.name()?);
    }
}
# Ok(())
# }
```

Each device type has its own facade in [`api`] with one method per Alpaca
operation, e.g. [`api::Camera::image_array`]. Every call blocks until the server
answers and returns [`Result`]: protocol errors reported by the device are
[`Error::Ascom`], non-2xx statuses are [`Error::Request`].

All devices created from the same [`Client`] share a single [`ClientIdentity`],
so `ClientTransactionID`s stay unique across them, including when the
devices are used from several threads.

## Features

One Cargo feature per device type (`camera`, `telescope`, ...), all enabled by
default through `all-devices`.
*/

pub mod api;

mod client;
pub use client::{
    Client, ClientBuilder, ClientIdentity, DeviceClient, DeviceSession, DiscoveryClient, Scheme,
};

mod discovery;

mod errors;
pub use errors::{
    ASCOMError, ASCOMErrorCode, ASCOMResult, AlpacaRequestError, Error, ErrorKind, Result,
};

pub mod params;
pub use params::{ASCOMParam, Method, OpaqueParams};

mod response;

#[cfg(feature = "camera")]
pub use api::camera::decode_image_bytes;

#[cfg(test)]
mod test_utils;
