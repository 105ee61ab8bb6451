pub use super::camera_telescope_shared::GuideDirection;
pub use super::image_array::{
    ImageArray, ImageArrayRank, ImageData, ImageElementType, ImageMetadata, decode_image_bytes,
};

use super::DeviceType;
use super::time_repr::{Fits, TimeRepr};
use crate::client::DeviceClient;
use crate::params::{Method, OpaqueParams};
use crate::{Client, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

/// Camera Specific Methods.
#[derive(Debug, Clone, derive_more::Deref)]
pub struct Camera {
    #[deref]
    device: DeviceClient,
    last_image: Arc<Mutex<LastImage>>,
}

/// Metadata of the most recently started `image_array` call.
#[derive(Debug, Default)]
struct LastImage {
    generation: u64,
    metadata: Option<ImageMetadata>,
}

impl LastImage {
    fn start(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.metadata = None;
        self.generation
    }

    /// Ignored if another retrieval started in the meantime.
    fn finish(&mut self, generation: u64, metadata: Option<ImageMetadata>) {
        if self.generation == generation {
            self.metadata = metadata;
        }
    }
}

impl Camera {
    /// Client for the camera with the given number on this server.
    pub fn new(client: &Client, device_number: u32) -> Self {
        Self {
            device: client.device_client(DeviceType::Camera, device_number),
            last_image: Arc::default(),
        }
    }

    fn last_image(&self) -> MutexGuard<'_, LastImage> {
        self.last_image.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the pixel values from the last exposure.
    ///
    /// Requests the binary ImageBytes transfer and falls back to the JSON
    /// array when the server doesn't support it. The array is 3D either way:
    /// `NumX x NumY x 1` for monochrome and Bayer sensors, `NumX x NumY x NumPlanes`
    /// for colour ones, with the rightmost index varying fastest.
    ///
    /// With concurrent calls on clones of the same camera,
    /// [`image_array_info`](Self::image_array_info) reflects the call that started last.
    pub fn image_array(&self) -> Result<ImageArray> {
        let generation = self.last_image().start();
        let image = self.exec_action::<ImageArray>(Method::Get, "imagearray", OpaqueParams::new())?;
        self.last_image().finish(generation, image.metadata);
        Ok(image)
    }

    /// Same pixel values as [`image_array`](Self::image_array) via the `imagearrayvariant` operation.
    pub fn image_array_variant(&self) -> Result<ImageArray> {
        self.exec_action(Method::Get, "imagearrayvariant", OpaqueParams::new())
    }

    /// Binary header of the last image retrieved by [`image_array`](Self::image_array).
    ///
    /// `None` before the first retrieval and when the server answered with JSON.
    pub fn image_array_info(&self) -> Option<ImageMetadata> {
        self.last_image().metadata
    }
}

rpc_device! {
    impl Camera {
        /// Returns the X offset of the Bayer matrix, as defined in `SensorType`.
        #[http("bayeroffsetx", method = Get)]
        fn bayer_offset_x(&self) -> i32;

        /// Returns the Y offset of the Bayer matrix, as defined in `SensorType`.
        #[http("bayeroffsety", method = Get)]
        fn bayer_offset_y(&self) -> i32;

        /// Returns the binning factor for the X axis.
        #[http("binx", method = Get)]
        fn bin_x(&self) -> i32;

        /// Sets the binning factor for the X axis.
        #[http("binx", method = Put)]
        fn set_bin_x(&self, #[http("BinX")] bin_x: i32);

        /// Returns the binning factor for the Y axis.
        #[http("biny", method = Get)]
        fn bin_y(&self) -> i32;

        /// Sets the binning factor for the Y axis.
        #[http("biny", method = Put)]
        fn set_bin_y(&self, #[http("BinY")] bin_y: i32);

        /// Returns the current camera operational state.
        #[http("camerastate", method = Get)]
        fn camera_state(&self) -> CameraState;

        /// Returns the width of the CCD camera chip in unbinned pixels.
        #[http("cameraxsize", method = Get)]
        fn camera_x_size(&self) -> i32;

        /// Returns the height of the CCD camera chip in unbinned pixels.
        #[http("cameraysize", method = Get)]
        fn camera_y_size(&self) -> i32;

        /// Indicates whether the camera can abort exposures.
        #[http("canabortexposure", method = Get)]
        fn can_abort_exposure(&self) -> bool;

        /// Indicates whether the camera supports asymmetric binning.
        #[http("canasymmetricbin", method = Get)]
        fn can_asymmetric_bin(&self) -> bool;

        /// Indicates whether the camera has a fast readout mode.
        #[http("canfastreadout", method = Get)]
        fn can_fast_readout(&self) -> bool;

        /// Indicates whether the camera's cooler power setting can be read.
        #[http("cangetcoolerpower", method = Get)]
        fn can_get_cooler_power(&self) -> bool;

        /// Indicates whether this camera supports pulse guiding.
        #[http("canpulseguide", method = Get)]
        fn can_pulse_guide(&self) -> bool;

        /// Indicates whether this camera supports setting the CCD temperature.
        #[http("cansetccdtemperature", method = Get)]
        fn can_set_ccd_temperature(&self) -> bool;

        /// Indicates whether this camera can stop an exposure that is in progress.
        #[http("canstopexposure", method = Get)]
        fn can_stop_exposure(&self) -> bool;

        /// Returns the current CCD temperature in degrees Celsius.
        #[http("ccdtemperature", method = Get)]
        fn ccd_temperature(&self) -> f64;

        /// Returns the current cooler on/off state.
        #[http("cooleron", method = Get)]
        fn cooler_on(&self) -> bool;

        /// Turns the camera cooler on and off.
        #[http("cooleron", method = Put)]
        fn set_cooler_on(&self, #[http("CoolerOn")] cooler_on: bool);

        /// Returns the present cooler power level, in percent.
        #[http("coolerpower", method = Get)]
        fn cooler_power(&self) -> f64;

        /// Returns the gain of the camera in photoelectrons per A/D unit.
        #[http("electronsperadu", method = Get)]
        fn electrons_per_adu(&self) -> f64;

        /// Returns the maximum exposure time supported by `start_exposure`.
        #[http("exposuremax", method = Get)]
        fn exposure_max(&self) -> f64;

        /// Returns the minimum exposure time supported by `start_exposure`.
        #[http("exposuremin", method = Get)]
        fn exposure_min(&self) -> f64;

        /// Returns the smallest increment in exposure time supported by `start_exposure`.
        #[http("exposureresolution", method = Get)]
        fn exposure_resolution(&self) -> f64;

        /// Returns whether fast readout mode is enabled.
        #[http("fastreadout", method = Get)]
        fn fast_readout(&self) -> bool;

        /// Sets whether fast readout mode is enabled.
        #[http("fastreadout", method = Put)]
        fn set_fast_readout(&self, #[http("FastReadout")] fast_readout: bool);

        /// Reports the full well capacity of the camera in electrons, at the current camera settings (binning, SetupDialog settings, etc.).
        #[http("fullwellcapacity", method = Get)]
        fn full_well_capacity(&self) -> f64;

        /// Index into `gains` or gain value, depending on the gain mode of the camera.
        #[http("gain", method = Get)]
        fn gain(&self) -> i32;

        /// Sets the camera's gain.
        #[http("gain", method = Put)]
        fn set_gain(&self, #[http("Gain")] gain: i32);

        /// Returns the maximum value of Gain.
        #[http("gainmax", method = Get)]
        fn gain_max(&self) -> i32;

        /// Returns the minimum value of Gain.
        #[http("gainmin", method = Get)]
        fn gain_min(&self) -> i32;

        /// Returns the Gains supported by the camera.
        #[http("gains", method = Get)]
        fn gains(&self) -> Vec<String>;

        /// Returns a flag indicating whether this camera has a mechanical shutter.
        #[http("hasshutter", method = Get)]
        fn has_shutter(&self) -> bool;

        /// Returns the current heat sink temperature (called "ambient temperature" by some manufacturers) in degrees Celsius.
        #[http("heatsinktemperature", method = Get)]
        fn heat_sink_temperature(&self) -> f64;

        /// Returns a flag indicating whether the image is ready to be downloaded from the camera.
        #[http("imageready", method = Get)]
        fn image_ready(&self) -> bool;

        /// Returns a flag indicating whether the camera is currently in a PulseGuide operation.
        #[http("ispulseguiding", method = Get)]
        fn is_pulse_guiding(&self) -> bool;

        /// Reports the actual exposure duration in seconds (i.e. shutter open time).
        #[http("lastexposureduration", method = Get)]
        fn last_exposure_duration(&self) -> f64;

        /// Reports the actual exposure start in the FITS-standard CCYY-MM-DDThh:mm:ss[.sss...] format, UTC.
        #[http("lastexposurestarttime", method = Get, via = TimeRepr<Fits>)]
        fn last_exposure_start_time(&self) -> SystemTime;

        /// Reports the maximum ADU value the camera can produce.
        #[http("maxadu", method = Get)]
        fn max_adu(&self) -> i32;

        /// Returns the maximum allowed binning for the X camera axis.
        #[http("maxbinx", method = Get)]
        fn max_bin_x(&self) -> i32;

        /// Returns the maximum allowed binning for the Y camera axis.
        #[http("maxbiny", method = Get)]
        fn max_bin_y(&self) -> i32;

        /// Returns the current subframe width, if binning is active, value is in binned pixels.
        #[http("numx", method = Get)]
        fn num_x(&self) -> i32;

        /// Sets the current subframe width.
        #[http("numx", method = Put)]
        fn set_num_x(&self, #[http("NumX")] num_x: i32);

        /// Returns the current subframe height, if binning is active, value is in binned pixels.
        #[http("numy", method = Get)]
        fn num_y(&self) -> i32;

        /// Sets the current subframe height.
        #[http("numy", method = Put)]
        fn set_num_y(&self, #[http("NumY")] num_y: i32);

        /// Returns the camera's offset.
        #[http("offset", method = Get)]
        fn offset(&self) -> i32;

        /// Sets the camera's offset.
        #[http("offset", method = Put)]
        fn set_offset(&self, #[http("Offset")] offset: i32);

        /// Returns the maximum value of offset.
        #[http("offsetmax", method = Get)]
        fn offset_max(&self) -> i32;

        /// Returns the minimum value of offset.
        #[http("offsetmin", method = Get)]
        fn offset_min(&self) -> i32;

        /// Returns the offsets supported by the camera.
        #[http("offsets", method = Get)]
        fn offsets(&self) -> Vec<String>;

        /// Returns the percentage of the current operation that is complete.
        #[http("percentcompleted", method = Get)]
        fn percent_completed(&self) -> i32;

        /// Returns the width of the CCD chip pixels in microns.
        #[http("pixelsizex", method = Get)]
        fn pixel_size_x(&self) -> f64;

        /// Returns the height of the CCD chip pixels in microns.
        #[http("pixelsizey", method = Get)]
        fn pixel_size_y(&self) -> f64;

        /// Index into `readout_modes` of the current readout mode.
        #[http("readoutmode", method = Get)]
        fn readout_mode(&self) -> i32;

        /// Sets the readout mode.
        #[http("readoutmode", method = Put)]
        fn set_readout_mode(&self, #[http("ReadoutMode")] readout_mode: i32);

        /// List of available readout modes.
        #[http("readoutmodes", method = Get)]
        fn readout_modes(&self) -> Vec<String>;

        /// The name of the sensor used within the camera.
        #[http("sensorname", method = Get)]
        fn sensor_name(&self) -> String;

        /// Returns a value indicating whether the sensor is monochrome, or what Bayer matrix it encodes.
        #[http("sensortype", method = Get)]
        fn sensor_type(&self) -> SensorType;

        /// Returns the current camera cooler setpoint in degrees Celsius.
        #[http("setccdtemperature", method = Get)]
        fn set_ccd_temperature(&self) -> f64;

        /// Set the camera's cooler setpoint (degrees Celsius).
        #[http("setccdtemperature", method = Put)]
        fn set_set_ccd_temperature(
            &self,
            #[http("SetCCDTemperature")] set_ccd_temperature: f64,
        );

        /// Returns the current subframe start position for the X axis (0 based) in binned pixels.
        #[http("startx", method = Get)]
        fn start_x(&self) -> i32;

        /// Sets the current subframe X axis start position in binned pixels.
        #[http("startx", method = Put)]
        fn set_start_x(&self, #[http("StartX")] start_x: i32);

        /// Returns the current subframe start position for the Y axis (0 based) in binned pixels.
        #[http("starty", method = Get)]
        fn start_y(&self) -> i32;

        /// Sets the current subframe Y axis start position in binned pixels.
        #[http("starty", method = Put)]
        fn set_start_y(&self, #[http("StartY")] start_y: i32);

        /// The camera's sub exposure duration in seconds.
        ///
        /// _ICameraV3 and later._
        #[http("subexposureduration", method = Get)]
        fn sub_exposure_duration(&self) -> f64;

        /// Sets image sub exposure duration in seconds.
        ///
        /// _ICameraV3 and later._
        #[http("subexposureduration", method = Put)]
        fn set_sub_exposure_duration(
            &self,
            #[http("SubExposureDuration")] sub_exposure_duration: f64,
        );

        /// Aborts the current exposure, if any, and returns the camera to Idle state.
        #[http("abortexposure", method = Put)]
        fn abort_exposure(&self);

        /// Activates the Camera's mount control system to instruct the mount to move in a particular direction for a given period of time.
        #[http("pulseguide", method = Put)]
        fn pulse_guide(
            &self,
            #[http("Direction")] direction: GuideDirection,
            #[http("Duration")] duration: i32,
        );

        /// Starts an exposure of the given duration in seconds. Use `image_ready` to check when the exposure is complete.
        #[http("startexposure", method = Put)]
        fn start_exposure(
            &self,
            #[http("Duration")] duration: f64,
            #[http("Light")] light: bool,
        );

        /// Stops the current exposure, if any.
        ///
        /// If an exposure is in progress, the readout process is initiated. Ignored if readout is already in process.
        #[http("stopexposure", method = Put)]
        fn stop_exposure(&self);
    }
}

/// Camera state.
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
pub enum CameraState {
    /// Available to start exposure.
    Idle = 0,

    /// Exposure started but waiting (for shutter, trigger, filter wheel, etc.).
    Waiting = 1,

    /// Exposure currently in progress.
    Exposing = 2,

    /// Sensor array is being read out (digitized).
    Reading = 3,

    /// Downloading data to host.
    Download = 4,

    /// Camera error condition serious enough to prevent further operations.
    Error = 5,
}

/// The type of sensor in the camera.
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
pub enum SensorType {
    /// Single-plane monochrome sensor.
    Monochrome = 0,

    /// Multiple-plane color sensor.
    Color = 1,

    /// Single-plane Bayer matrix RGGB sensor.
    RGGB = 2,

    /// Single-plane Bayer matrix CMYG sensor.
    CMYG = 3,

    /// Single-plane Bayer matrix CMYG2 sensor.
    CMYG2 = 4,

    /// Single-plane Bayer matrix LRGB sensor.
    LRGB = 5,
}

#[cfg(test)]
mod tests {
    use super::{ImageArrayRank, ImageElementType, ImageMetadata, LastImage};

    fn metadata(dimension_1: usize) -> ImageMetadata {
        ImageMetadata {
            metadata_version: 1,
            image_element_type: ImageElementType::Int32,
            transmission_element_type: ImageElementType::UInt16,
            rank: ImageArrayRank::Rank2,
            dimension_1,
            dimension_2: 1,
            dimension_3: 0,
        }
    }

    #[test]
    fn overlapping_retrievals_keep_latest_info() {
        let mut last = LastImage::default();
        let older = last.start();
        let newer = last.start();

        last.finish(newer, Some(metadata(2)));
        last.finish(older, Some(metadata(1)));

        assert_eq!(last.metadata, Some(metadata(2)));
    }

    #[test]
    fn start_clears_previous_info() {
        let mut last = LastImage::default();
        let generation = last.start();
        last.finish(generation, Some(metadata(1)));

        let _ = last.start();
        assert_eq!(last.metadata, None);
    }
}
