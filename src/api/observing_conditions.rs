rpc_device! {
    /// ObservingConditions Specific Methods.
    pub struct ObservingConditions = ObservingConditions {
        /// Gets the time period over which observations will be averaged (hours).
        #[http("averageperiod", method = Get)]
        fn average_period(&self) -> f64;

        /// Sets the time period over which observations will be averaged (hours).
        #[http("averageperiod", method = Put)]
        fn set_average_period(&self, #[http("AveragePeriod")] average_period: f64);

        /// Gets the percentage of the sky obscured by cloud.
        #[http("cloudcover", method = Get)]
        fn cloud_cover(&self) -> f64;

        /// Gets the atmospheric dew point at the observatory reported in °C.
        #[http("dewpoint", method = Get)]
        fn dew_point(&self) -> f64;

        /// Gets the atmospheric humidity (%) at the observatory.
        #[http("humidity", method = Get)]
        fn humidity(&self) -> f64;

        /// Gets the atmospheric pressure in hectoPascals at the observatory's altitude - NOT reduced to sea level.
        #[http("pressure", method = Get)]
        fn pressure(&self) -> f64;

        /// Gets the rain rate (mm/hour) at the observatory.
        #[http("rainrate", method = Get)]
        fn rain_rate(&self) -> f64;

        /// Gets the sky brightness at the observatory (Lux).
        #[http("skybrightness", method = Get)]
        fn sky_brightness(&self) -> f64;

        /// Gets the sky quality at the observatory (magnitudes per square arc second).
        #[http("skyquality", method = Get)]
        fn sky_quality(&self) -> f64;

        /// Gets the sky temperature(°C) at the observatory.
        #[http("skytemperature", method = Get)]
        fn sky_temperature(&self) -> f64;

        /// Gets the seeing at the observatory measured as star full width half maximum (FWHM) in arc secs.
        #[http("starfwhm", method = Get)]
        fn star_fwhm(&self) -> f64;

        /// Gets the temperature(°C) at the observatory.
        #[http("temperature", method = Get)]
        fn temperature(&self) -> f64;

        /// Gets the wind direction.
        ///
        /// The returned value must be between 0.0 and 360.0, interpreted according to the metereological standard,
        /// where a special value of 0.0 is returned when the wind speed is 0.0.
        #[http("winddirection", method = Get)]
        fn wind_direction(&self) -> f64;

        /// Gets the peak 3 second wind gust(m/s) at the observatory over the last 2 minutes.
        #[http("windgust", method = Get)]
        fn wind_gust(&self) -> f64;

        /// Gets the wind speed(m/s) at the observatory.
        #[http("windspeed", method = Get)]
        fn wind_speed(&self) -> f64;

        /// Forces the driver to immediately query its attached hardware to refresh sensor values.
        #[http("refresh", method = Put)]
        fn refresh(&self);

        /// Gets a description of the sensor with the name specified in the SensorName parameter.
        #[http("sensordescription", method = Get)]
        fn sensor_description(&self, #[http("SensorName")] sensor_name: &str) -> String;

        /// Gets the time since the sensor specified in the SensorName parameter was last updated.
        ///
        /// The value is in seconds. An empty name returns the time since any sensor was last updated.
        #[http("timesincelastupdate", method = Get)]
        fn time_since_last_update(&self, #[http("SensorName")] sensor_name: &str) -> f64;
    }
}
