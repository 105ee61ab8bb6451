use crate::client::DeviceClient;
use serde::{Deserialize, Serialize};

rpc_device! {
    impl DeviceClient {
        /// Invokes the named device-specific action.
        ///
        /// Actions and SupportedActions are the standard way for drivers to expose functionality
        /// beyond the built-in interface. The list of supported names is available from
        /// [`supported_actions`](Self::supported_actions).
        #[http("action", method = Put)]
        fn action(
            &self,
            #[http("Action")] action: &str,
            #[http("Parameters")] parameters: &str,
        ) -> String;

        /// Transmits an arbitrary string to the device and does not wait for a response.
        ///
        /// Optionally, protocol framing characters may be added to the string before transmission.
        #[http("commandblind", method = Put)]
        #[deprecated(note = "Use the more flexible Action and SupportedActions mechanic.")]
        fn command_blind(&self, #[http("Command")] command: &str, #[http("Raw")] raw: bool);

        /// Transmits an arbitrary string to the device and waits for a boolean response.
        ///
        /// Optionally, protocol framing characters may be added to the string before transmission.
        #[http("commandbool", method = Put)]
        #[deprecated(note = "Use the more flexible Action and SupportedActions mechanic.")]
        fn command_bool(&self, #[http("Command")] command: &str, #[http("Raw")] raw: bool) -> bool;

        /// Transmits an arbitrary string to the device and waits for a string response.
        ///
        /// Optionally, protocol framing characters may be added to the string before transmission.
        #[http("commandstring", method = Put)]
        #[deprecated(note = "Use the more flexible Action and SupportedActions mechanic.")]
        fn command_string(&self, #[http("Command")] command: &str, #[http("Raw")] raw: bool) -> String;

        /// Retrieves the connected state of the device.
        #[http("connected", method = Get)]
        fn connected(&self) -> bool;

        /// Sets the connected state of the device.
        ///
        /// Prefer the non-blocking [`connect`](Self::connect) and [`disconnect`](Self::disconnect)
        /// with [`connecting`](Self::connecting) as the completion property.
        #[http("connected", method = Put)]
        fn set_connected(&self, #[http("Connected")] connected: bool);

        /// Starts connecting to the device. Completion is signalled by [`connecting`](Self::connecting) turning false.
        ///
        /// _Platform 7 onward._
        #[http("connect", method = Put)]
        fn connect(&self);

        /// Returns true while the device is connecting or disconnecting.
        ///
        /// _Platform 7 onward._
        #[http("connecting", method = Get)]
        fn connecting(&self) -> bool;

        /// The description of the device.
        #[http("description", method = Get)]
        fn description(&self) -> String;

        /// All operational values of the device that are definitively known.
        ///
        /// _Platform 7 onward._
        #[http("devicestate", method = Get)]
        fn device_state(&self) -> Vec<DeviceStateItem>;

        /// Starts disconnecting from the device. Completion is signalled by [`connecting`](Self::connecting) turning false.
        ///
        /// _Platform 7 onward._
        #[http("disconnect", method = Put)]
        fn disconnect(&self);

        /// The description of the driver.
        #[http("driverinfo", method = Get)]
        fn driver_info(&self) -> String;

        /// A string containing only the major and minor version of the driver, in the form "n.n".
        #[http("driverversion", method = Get)]
        fn driver_version(&self) -> String;

        /// The interface version number that this device supports.
        #[http("interfaceversion", method = Get)]
        fn interface_version(&self) -> i32;

        /// The name of the device.
        #[http("name", method = Get)]
        fn name(&self) -> String;

        /// Returns the list of action names supported by this driver.
        #[http("supportedactions", method = Get)]
        fn supported_actions(&self) -> Vec<String>;
    }
}

/// An operational property of a device, as returned by [`DeviceClient::device_state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceStateItem {
    /// The property name, cased as in the interface definition.
    pub name: String,

    /// The value of the property.
    ///
    /// Dynamically typed: Int16, Int32, Single, Double, String, Boolean or DateTime (as an ISO 8601 string).
    pub value: serde_json::Value,
}
