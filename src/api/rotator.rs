rpc_device! {
    /// Rotator Specific Methods.
    pub struct Rotator = Rotator {
        /// True if the Rotator supports the [`reverse`](Self::reverse) method.
        ///
        /// Always true for IRotatorV3 and later.
        #[http("canreverse", method = Get)]
        fn can_reverse(&self) -> bool;

        /// True if the rotator is currently moving to a new position. False if the rotator is stationary.
        #[http("ismoving", method = Get)]
        fn is_moving(&self) -> bool;

        /// Returns the raw mechanical position of the rotator in degrees.
        #[http("mechanicalposition", method = Get)]
        fn mechanical_position(&self) -> f64;

        /// Current instantaneous Rotator position, in degrees.
        #[http("position", method = Get)]
        fn position(&self) -> f64;

        /// Returns the rotator’s Reverse state.
        #[http("reverse", method = Get)]
        fn reverse(&self) -> bool;

        /// Sets the rotator’s Reverse state.
        #[http("reverse", method = Put)]
        fn set_reverse(&self, #[http("Reverse")] reverse: bool);

        /// The minimum StepSize, in degrees.
        #[http("stepsize", method = Get)]
        fn step_size(&self) -> f64;

        /// The destination position angle for Move() and MoveAbsolute().
        #[http("targetposition", method = Get)]
        fn target_position(&self) -> f64;

        /// Immediately stop any Rotator motion due to a previous Move or MoveAbsolute method call.
        #[http("halt", method = Put)]
        fn halt(&self);

        /// Causes the rotator to move Position degrees relative to the current Position value.
        #[http("move", method = Put)]
        fn move_(&self, #[http("Position")] position: f64);

        /// Causes the rotator to move the absolute position of Position degrees.
        ///
        /// The angle is sent as given, so values outside `0..360` are left to the server to reject.
        #[http("moveabsolute", method = Put)]
        fn move_absolute(&self, #[http("Position")] position: f64);

        /// Causes the rotator to move the mechanical position of Position degrees.
        #[http("movemechanical", method = Put)]
        fn move_mechanical(&self, #[http("Position")] position: f64);

        /// Causes the rotator to sync to the position of Position degrees.
        #[http("sync", method = Put)]
        fn sync(&self, #[http("Position")] position: f64);
    }
}
