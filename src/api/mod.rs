/*!
ASCOM Alpaca Device API v1 clients.

Alpaca device URLs are of the form **http(s)://host:port/api/v1/{device_type}/{device_number}/{operation}**,
e.g. the position of the second focuser on 192.168.1.89:7843 is read from
**http://192.168.1.89:7843/api/v1/focuser/1/position**.

URLs are lower case. Parameter names are not case sensitive. `GET` operations
send their parameters in the query string, `PUT` operations in a form body.

## HTTP Status Codes and ASCOM Error codes
A `200` status means that the transaction was handled by the device's transaction
management layer, not that the operation succeeded: the `ErrorNumber` and
`ErrorMessage` fields of the response still have to be checked, and every
client method here does that for you, returning [`ASCOMError`](crate::ASCOMError)
wrapped in [`Error::Ascom`](crate::Error::Ascom) when they are set.

Any status other than `200`-`203` is returned as
[`Error::Request`](crate::Error::Request).
*/

mod server_info;
pub use server_info::*;

mod time_repr;

#[cfg(any(feature = "camera", feature = "telescope"))]
mod camera_telescope_shared;
#[cfg(any(feature = "camera", feature = "telescope"))]
pub use camera_telescope_shared::GuideDirection;

#[cfg(feature = "camera")]
mod image_array;

#[macro_use]
mod macros;

/// Types related to the operations common to all devices.
pub mod device;
pub use device::DeviceStateItem;

/// Error returned when parsing an unknown device type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown Alpaca device type {0:?}")]
pub struct UnknownDeviceType(String);

rpc_mod! {
    #[cfg(feature = "camera")]
    camera::Camera = "camera",

    #[cfg(feature = "cover_calibrator")]
    cover_calibrator::CoverCalibrator = "covercalibrator",

    #[cfg(feature = "dome")]
    dome::Dome = "dome",

    #[cfg(feature = "filter_wheel")]
    filter_wheel::FilterWheel = "filterwheel",

    #[cfg(feature = "focuser")]
    focuser::Focuser = "focuser",

    #[cfg(feature = "observing_conditions")]
    observing_conditions::ObservingConditions = "observingconditions",

    #[cfg(feature = "rotator")]
    rotator::Rotator = "rotator",

    #[cfg(feature = "safety_monitor")]
    safety_monitor::SafetyMonitor = "safetymonitor",

    #[cfg(feature = "switch")]
    switch::Switch = "switch",

    #[cfg(feature = "telescope")]
    telescope::Telescope = "telescope",
}

#[cfg(test)]
mod tests {
    use super::DeviceType;

    #[test]
    fn device_type_renders_lower_case() {
        assert_eq!(DeviceType::CoverCalibrator.to_string(), "covercalibrator");
        assert_eq!(DeviceType::ObservingConditions.to_string(), "observingconditions");
    }

    #[test]
    fn device_type_parses_any_case() -> eyre::Result<()> {
        for &device_type in DeviceType::ALL {
            let name = format!("{device_type:?}");
            assert_eq!(name.parse::<DeviceType>()?, device_type);
            assert_eq!(name.to_uppercase().parse::<DeviceType>()?, device_type);
            assert_eq!(device_type.to_string().parse::<DeviceType>()?, device_type);
        }
        assert!("Spectrograph".parse::<DeviceType>().is_err());
        Ok(())
    }

    #[test]
    fn device_type_serde() -> eyre::Result<()> {
        assert_eq!(serde_json::to_string(&DeviceType::FilterWheel)?, r#""FilterWheel""#);
        assert_eq!(
            serde_json::from_str::<DeviceType>(r#""safetymonitor""#)?,
            DeviceType::SafetyMonitor
        );
        Ok(())
    }
}
