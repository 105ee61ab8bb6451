rpc_device! {
    /// SafetyMonitor Specific Methods.
    pub struct SafetyMonitor = SafetyMonitor {
        /// Indicates whether the monitored state is safe for use.
        ///
        /// True if the state is safe, False if it is unsafe.
        #[http("issafe", method = Get)]
        fn is_safe(&self) -> bool;
    }
}
