pub use super::camera_telescope_shared::GuideDirection;

use super::time_repr::{Iso8601Utc, TimeRepr};
use crate::params::ascom_enum_param;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Deserialize;
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::ops::RangeInclusive;
use std::time::SystemTime;

rpc_device! {
    /// Telescope Specific Methods.
    pub struct Telescope = Telescope {
        /// Returns the alignment mode of the mount (Alt/Az, Polar, German Polar).
        #[http("alignmentmode", method = Get)]
        fn alignment_mode(&self) -> AlignmentMode;

        /// The altitude above the local horizon of the mount's current position (degrees, positive up).
        #[http("altitude", method = Get)]
        fn altitude(&self) -> f64;

        /// The area of the telescope's aperture, taking into account any obstructions (square meters).
        #[http("aperturearea", method = Get)]
        fn aperture_area(&self) -> f64;

        /// The telescope's effective aperture diameter (meters).
        #[http("aperturediameter", method = Get)]
        fn aperture_diameter(&self) -> f64;

        /// True if the mount is stopped in the Home position.
        ///
        /// Set only following a FindHome() operation, and reset with any slew operation.
        #[http("athome", method = Get)]
        fn at_home(&self) -> bool;

        /// True if the telescope has been put into the parked state by [`park`](Self::park).
        #[http("atpark", method = Get)]
        fn at_park(&self) -> bool;

        /// The azimuth at the local horizon of the mount's current position (degrees, North-referenced, positive East/clockwise).
        #[http("azimuth", method = Get)]
        fn azimuth(&self) -> f64;

        /// True if this telescope is capable of programmed finding its home position.
        #[http("canfindhome", method = Get)]
        fn can_find_home(&self) -> bool;

        /// True if this telescope is capable of programmed parking.
        #[http("canpark", method = Get)]
        fn can_park(&self) -> bool;

        /// True if this telescope is capable of software-pulsed guiding.
        #[http("canpulseguide", method = Get)]
        fn can_pulse_guide(&self) -> bool;

        /// True if the DeclinationRate property can be changed to provide offset tracking in the declination axis.
        #[http("cansetdeclinationrate", method = Get)]
        fn can_set_declination_rate(&self) -> bool;

        /// True if the guide rate properties used for PulseGuide can be adjusted.
        #[http("cansetguiderates", method = Get)]
        fn can_set_guide_rates(&self) -> bool;

        /// True if this telescope is capable of programmed setting of its park position.
        #[http("cansetpark", method = Get)]
        fn can_set_park(&self) -> bool;

        /// True if the SideOfPier property can be set, meaning that the mount can be forced to flip.
        #[http("cansetpierside", method = Get)]
        fn can_set_pier_side(&self) -> bool;

        /// True if the RightAscensionRate property can be changed to provide offset tracking in the right ascension axis.
        #[http("cansetrightascensionrate", method = Get)]
        fn can_set_right_ascension_rate(&self) -> bool;

        /// True if the Tracking property can be changed, turning telescope sidereal tracking on and off.
        #[http("cansettracking", method = Get)]
        fn can_set_tracking(&self) -> bool;

        /// True if this telescope is capable of programmed slewing (synchronous or asynchronous) to equatorial coordinates.
        #[http("canslew", method = Get)]
        fn can_slew(&self) -> bool;

        /// True if this telescope is capable of synchronous slewing to local horizontal coordinates.
        #[http("canslewaltaz", method = Get)]
        fn can_slew_alt_az(&self) -> bool;

        /// True if this telescope is capable of asynchronous slewing to local horizontal coordinates.
        #[http("canslewaltazasync", method = Get)]
        fn can_slew_alt_az_async(&self) -> bool;

        /// True if this telescope is capable of asynchronous slewing to equatorial coordinates.
        #[http("canslewasync", method = Get)]
        fn can_slew_async(&self) -> bool;

        /// True if this telescope is capable of programmed synching to equatorial coordinates.
        #[http("cansync", method = Get)]
        fn can_sync(&self) -> bool;

        /// True if this telescope is capable of programmed synching to local horizontal coordinates.
        #[http("cansyncaltaz", method = Get)]
        fn can_sync_alt_az(&self) -> bool;

        /// True if this telescope is capable of programmed unparking.
        #[http("canunpark", method = Get)]
        fn can_unpark(&self) -> bool;

        /// The declination (degrees) of the mount's current equatorial coordinates, in the coordinate system given by [`equatorial_system`](Self::equatorial_system).
        #[http("declination", method = Get)]
        fn declination(&self) -> f64;

        /// The declination tracking rate (arcseconds per second, default = 0.0).
        #[http("declinationrate", method = Get)]
        fn declination_rate(&self) -> f64;

        /// Sets the declination tracking rate (arcseconds per second).
        #[http("declinationrate", method = Put)]
        fn set_declination_rate(&self, #[http("DeclinationRate")] declination_rate: f64);

        /// True if the telescope or driver applies atmospheric refraction to coordinates.
        #[http("doesrefraction", method = Get)]
        fn does_refraction(&self) -> bool;

        /// Causes the telescope to apply atmospheric refraction to coordinates.
        #[http("doesrefraction", method = Put)]
        fn set_does_refraction(&self, #[http("DoesRefraction")] does_refraction: bool);

        /// Returns the current equatorial coordinate system used by this telescope.
        #[http("equatorialsystem", method = Get)]
        fn equatorial_system(&self) -> EquatorialCoordinateType;

        /// The telescope's focal length in meters.
        #[http("focallength", method = Get)]
        fn focal_length(&self) -> f64;

        /// The current Declination movement rate offset for telescope guiding (degrees/sec).
        #[http("guideratedeclination", method = Get)]
        fn guide_rate_declination(&self) -> f64;

        /// Sets the current Declination movement rate offset for telescope guiding (degrees/sec).
        #[http("guideratedeclination", method = Put)]
        fn set_guide_rate_declination(
            &self,
            #[http("GuideRateDeclination")] guide_rate_declination: f64,
        );

        /// The current RightAscension movement rate offset for telescope guiding (degrees/sec).
        #[http("guideraterightascension", method = Get)]
        fn guide_rate_right_ascension(&self) -> f64;

        /// Sets the current RightAscension movement rate offset for telescope guiding (degrees/sec).
        #[http("guideraterightascension", method = Put)]
        fn set_guide_rate_right_ascension(
            &self,
            #[http("GuideRateRightAscension")] guide_rate_right_ascension: f64,
        );

        /// True if a [`pulse_guide`](Self::pulse_guide) command is in progress, False otherwise.
        #[http("ispulseguiding", method = Get)]
        fn is_pulse_guiding(&self) -> bool;

        /// The right ascension (hours) of the mount's current equatorial coordinates.
        #[http("rightascension", method = Get)]
        fn right_ascension(&self) -> f64;

        /// The right ascension tracking rate (arcseconds per second, default = 0.0).
        #[http("rightascensionrate", method = Get)]
        fn right_ascension_rate(&self) -> f64;

        /// Sets the right ascension tracking rate (arcseconds per second).
        #[http("rightascensionrate", method = Put)]
        fn set_right_ascension_rate(
            &self,
            #[http("RightAscensionRate")] right_ascension_rate: f64,
        );

        /// Indicates the pointing state of the mount.
        #[http("sideofpier", method = Get)]
        fn side_of_pier(&self) -> PierSide;

        /// Sets the pointing state of the mount.
        #[http("sideofpier", method = Put)]
        fn set_side_of_pier(&self, #[http("SideOfPier")] side_of_pier: PierSide);

        /// The local apparent sidereal time from the telescope's internal clock (hours, sidereal).
        #[http("siderealtime", method = Get)]
        fn sidereal_time(&self) -> f64;

        /// The elevation above mean sea level (meters) of the site at which the telescope is located.
        #[http("siteelevation", method = Get)]
        fn site_elevation(&self) -> f64;

        /// Sets the elevation above mean sea level (metres) of the site at which the telescope is located.
        #[http("siteelevation", method = Put)]
        fn set_site_elevation(&self, #[http("SiteElevation")] site_elevation: f64);

        /// The geodetic(map) latitude (degrees, positive North, WGS84) of the site at which the telescope is located.
        #[http("sitelatitude", method = Get)]
        fn site_latitude(&self) -> f64;

        /// Sets the observing site's latitude (degrees).
        #[http("sitelatitude", method = Put)]
        fn set_site_latitude(&self, #[http("SiteLatitude")] site_latitude: f64);

        /// The longitude (degrees, positive East, WGS84) of the site at which the telescope is located.
        #[http("sitelongitude", method = Get)]
        fn site_longitude(&self) -> f64;

        /// Sets the observing site's longitude (degrees, positive East, WGS84).
        #[http("sitelongitude", method = Put)]
        fn set_site_longitude(&self, #[http("SiteLongitude")] site_longitude: f64);

        /// True if telescope is currently moving in response to one of the Slew methods or the MoveAxis method, False at all other times.
        #[http("slewing", method = Get)]
        fn slewing(&self) -> bool;

        /// Returns the post-slew settling time (sec.).
        #[http("slewsettletime", method = Get)]
        fn slew_settle_time(&self) -> i32;

        /// Sets the post-slew settling time (integer sec.).
        #[http("slewsettletime", method = Put)]
        fn set_slew_settle_time(&self, #[http("SlewSettleTime")] slew_settle_time: i32);

        /// The declination (degrees, positive North) for the target of an equatorial slew or sync operation.
        #[http("targetdeclination", method = Get)]
        fn target_declination(&self) -> f64;

        /// Sets the declination (degrees, positive North) for the target of an equatorial slew or sync operation.
        #[http("targetdeclination", method = Put)]
        fn set_target_declination(&self, #[http("TargetDeclination")] target_declination: f64);

        /// The right ascension (hours) for the target of an equatorial slew or sync operation.
        #[http("targetrightascension", method = Get)]
        fn target_right_ascension(&self) -> f64;

        /// Sets the right ascension (hours) for the target of an equatorial slew or sync operation.
        #[http("targetrightascension", method = Put)]
        fn set_target_right_ascension(
            &self,
            #[http("TargetRightAscension")] target_right_ascension: f64,
        );

        /// Returns the state of the telescope's sidereal tracking drive.
        #[http("tracking", method = Get)]
        fn tracking(&self) -> bool;

        /// Sets the state of the telescope's sidereal tracking drive.
        #[http("tracking", method = Put)]
        fn set_tracking(&self, #[http("Tracking")] tracking: bool);

        /// The current tracking rate of the telescope's sidereal drive.
        #[http("trackingrate", method = Get)]
        fn tracking_rate(&self) -> DriveRate;

        /// Sets the tracking rate of the telescope's sidereal drive.
        #[http("trackingrate", method = Put)]
        fn set_tracking_rate(&self, #[http("TrackingRate")] tracking_rate: DriveRate);

        /// Returns an array of supported DriveRates values that describe the permissible values of the TrackingRate property for this telescope type.
        #[http("trackingrates", method = Get)]
        fn tracking_rates(&self) -> Vec<DriveRate>;

        /// The UTC date/time of the telescope's internal clock.
        #[http("utcdate", method = Get, via = TimeRepr<Iso8601Utc>)]
        fn utc_date(&self) -> SystemTime;

        /// The UTC date/time of the telescope's internal clock.
        #[http("utcdate", method = Put)]
        fn set_utc_date(&self, #[http("UTCDate", via = TimeRepr<Iso8601Utc>)] utc_date: SystemTime);

        /// Immediately Stops a slew in progress.
        #[http("abortslew", method = Put)]
        fn abort_slew(&self);

        /// The rates at which the telescope may be moved about the specified axis by the [`move_axis`](Self::move_axis) method.
        #[http("axisrates", method = Get, via = AxisRates)]
        fn axis_rates(&self, #[http("Axis")] axis: TelescopeAxis) -> Vec<RangeInclusive<f64>>;

        /// True if this telescope can move the requested axis.
        #[http("canmoveaxis", method = Get)]
        fn can_move_axis(&self, #[http("Axis")] axis: TelescopeAxis) -> bool;

        /// Predicts the pointing state that a German equatorial mount will be in if it slews to the given coordinates.
        #[http("destinationsideofpier", method = Get)]
        fn destination_side_of_pier(
            &self,
            #[http("RightAscension")] right_ascension: f64,
            #[http("Declination")] declination: f64,
        ) -> PierSide;

        /// Locates the telescope's "home" position (asynchronous).
        #[http("findhome", method = Put)]
        fn find_home(&self);

        /// Move the telescope in one axis at the given rate (degrees/sec).
        #[http("moveaxis", method = Put)]
        fn move_axis(&self, #[http("Axis")] axis: TelescopeAxis, #[http("Rate")] rate: f64);

        /// Move the telescope to its park position, stop all motion (or restrict to a small safe range), and set AtPark to True.
        #[http("park", method = Put)]
        fn park(&self);

        /// Moves the scope in the given direction for the given interval or time at the rate given by the corresponding guide rate property.
        #[http("pulseguide", method = Put)]
        fn pulse_guide(
            &self,
            #[http("Direction")] direction: GuideDirection,
            #[http("Duration")] duration: i32,
        );

        /// Sets the telescope's park position to be its current position.
        #[http("setpark", method = Put)]
        fn set_park(&self);

        /// Move the telescope to the given local horizontal coordinates, return when slew is complete.
        ///
        /// The azimuth is sent as given; range checking is left to the server.
        #[http("slewtoaltaz", method = Put)]
        #[deprecated(note = "Use `slew_to_alt_az_async` instead.")]
        fn slew_to_alt_az(&self, #[http("Azimuth")] azimuth: f64, #[http("Altitude")] altitude: f64);

        /// Move the telescope to the given local horizontal coordinates, return immediately after the slew starts.
        ///
        /// The client can poll [`slewing`](Self::slewing) to determine when the mount reaches the intended coordinates.
        #[http("slewtoaltazasync", method = Put)]
        fn slew_to_alt_az_async(
            &self,
            #[http("Azimuth")] azimuth: f64,
            #[http("Altitude")] altitude: f64,
        );

        /// Move the telescope to the given equatorial coordinates, return when slew is complete.
        #[http("slewtocoordinates", method = Put)]
        #[deprecated(note = "Use `slew_to_coordinates_async` instead.")]
        fn slew_to_coordinates(
            &self,
            #[http("RightAscension")] right_ascension: f64,
            #[http("Declination")] declination: f64,
        );

        /// Move the telescope to the given equatorial coordinates, return immediately after the slew starts.
        #[http("slewtocoordinatesasync", method = Put)]
        fn slew_to_coordinates_async(
            &self,
            #[http("RightAscension")] right_ascension: f64,
            #[http("Declination")] declination: f64,
        );

        /// Move the telescope to the TargetRightAscension and TargetDeclination equatorial coordinates, return when slew is complete.
        #[http("slewtotarget", method = Put)]
        #[deprecated(note = "Use `slew_to_target_async` instead.")]
        fn slew_to_target(&self);

        /// Move the telescope to the TargetRightAscension and TargetDeclination equatorial coordinates, return immediately after the slew starts.
        #[http("slewtotargetasync", method = Put)]
        fn slew_to_target_async(&self);

        /// Matches the scope's local horizontal coordinates to the given local horizontal coordinates.
        #[http("synctoaltaz", method = Put)]
        fn sync_to_alt_az(&self, #[http("Azimuth")] azimuth: f64, #[http("Altitude")] altitude: f64);

        /// Matches the scope's equatorial coordinates to the given equatorial coordinates.
        #[http("synctocoordinates", method = Put)]
        fn sync_to_coordinates(
            &self,
            #[http("RightAscension")] right_ascension: f64,
            #[http("Declination")] declination: f64,
        );

        /// Matches the scope's equatorial coordinates to the TargetRightAscension and TargetDeclination equatorial coordinates.
        #[http("synctotarget", method = Put)]
        fn sync_to_target(&self);

        /// Takes telescope out of the Parked state.
        #[http("unpark", method = Put)]
        fn unpark(&self);
    }
}

/// The alignment mode (geometry) of the mount.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum AlignmentMode {
    /// Altitude-Azimuth type mount.
    AltAz = 0,

    /// Polar (equatorial) mount other than German equatorial.
    Polar = 1,

    /// German equatorial type mount.
    GermanPolar = 2,
}

/// The equatorial coordinate system used by the mount.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum EquatorialCoordinateType {
    /// Custom or unknown equinox and/or reference frame.
    Other = 0,

    /// Topocentric coordinates.
    Topocentric = 1,

    /// J2000 equator/equinox.
    J2000 = 2,

    /// J2050 equator/equinox.
    J2050 = 3,

    /// B1950 equinox, FK4 reference frame.
    B1950 = 4,
}

/// Pointing state of the mount.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum PierSide {
    /// Normal pointing state, mount on the East side of pier (looking West).
    East = 0,

    /// Through the pole pointing state, mount on the West side of pier (looking East).
    West = 1,

    /// Unknown or indeterminate.
    Unknown = -1,
}

/// One of the standard drive rates.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum DriveRate {
    /// Sidereal tracking rate (15.041 arcseconds per second).
    Sidereal = 0,

    /// Lunar tracking rate (14.685 arcseconds per second).
    Lunar = 1,

    /// Solar tracking rate (15.0 arcseconds per second).
    Solar = 2,

    /// King tracking rate (15.0369 arcseconds per second).
    King = 3,
}

/// The axis about which rate information is desired.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum TelescopeAxis {
    /// Primary axis (e.g., Right Ascension or Azimuth).
    Primary = 0,

    /// Secondary axis (e.g., Declination or Altitude).
    Secondary = 1,

    /// Tertiary axis (e.g. imager rotator/de-rotator).
    Tertiary = 2,
}

ascom_enum_param!(PierSide, DriveRate, TelescopeAxis);

/// A single `{"Minimum", "Maximum"}` entry of the `axisrates` response (degrees per second).
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AxisRate {
    minimum: f64,
    maximum: f64,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct AxisRates(Vec<AxisRate>);

impl From<AxisRates> for Vec<RangeInclusive<f64>> {
    fn from(axis_rates: AxisRates) -> Self {
        axis_rates
            .0
            .into_iter()
            .map(|axis_rate| axis_rate.minimum..=axis_rate.maximum)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisRates, DriveRate, PierSide, TelescopeAxis};
    use crate::params::ASCOMParam;
    use std::ops::RangeInclusive;

    #[test]
    fn enums_are_sent_as_discriminants() {
        assert_eq!(PierSide::Unknown.to_param(), "-1");
        assert_eq!(DriveRate::King.to_param(), "3");
        assert_eq!(TelescopeAxis::Secondary.to_param(), "1");
    }

    #[test]
    fn axis_rates_become_ranges() -> eyre::Result<()> {
        let rates: AxisRates = serde_json::from_str(
            r#"[{"Minimum":0.0,"Maximum":0.5},{"Minimum":1.0,"Maximum":4.0}]"#,
        )?;
        let ranges = Vec::<RangeInclusive<f64>>::from(rates);
        assert_eq!(ranges, [0.0..=0.5, 1.0..=4.0]);
        Ok(())
    }
}
