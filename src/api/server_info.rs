use super::DeviceType;
use serde::{Deserialize, Serialize};

/// An entry of the server's configured devices list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredDevice {
    /// Device name.
    #[serde(rename = "DeviceName")]
    pub device_name: String,
    /// Device type.
    #[serde(rename = "DeviceType")]
    pub device_type: DeviceType,
    /// Zero-based index of the device among devices of the same type.
    #[serde(rename = "DeviceNumber")]
    pub device_number: u32,
    /// Globally unique device ID.
    #[serde(rename = "UniqueID")]
    pub unique_id: String,
}

/// General information about the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerInfo {
    /// Server name.
    pub server_name: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Manufacturer version.
    pub manufacturer_version: String,
    /// Server location.
    pub location: String,
}
