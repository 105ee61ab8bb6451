rpc_device! {
    /// FilterWheel Specific Methods.
    pub struct FilterWheel = FilterWheel {
        /// An integer array of filter focus offsets.
        #[http("focusoffsets", method = Get)]
        fn focus_offsets(&self) -> Vec<i32>;

        /// The names of the filters.
        #[http("names", method = Get)]
        fn names(&self) -> Vec<String>;

        /// Returns the current filter wheel position, or -1 while the wheel is moving.
        #[http("position", method = Get)]
        fn position(&self) -> i32;

        /// Sets the filter wheel position.
        #[http("position", method = Put)]
        fn set_position(&self, #[http("Position")] position: i32);
    }
}
