rpc_device! {
    /// Focuser Specific Methods.
    pub struct Focuser = Focuser {
        /// True if the focuser is capable of absolute position; that is, being commanded to a specific step location.
        #[http("absolute", method = Get)]
        fn absolute(&self) -> bool;

        /// True if the focuser is currently moving to a new position. False if the focuser is stationary.
        #[http("ismoving", method = Get)]
        fn is_moving(&self) -> bool;

        /// Maximum increment size allowed by the focuser; i.e. the maximum number of steps allowed in one move operation.
        #[http("maxincrement", method = Get)]
        fn max_increment(&self) -> i32;

        /// Maximum step position permitted.
        #[http("maxstep", method = Get)]
        fn max_step(&self) -> i32;

        /// Current focuser position, in steps.
        #[http("position", method = Get)]
        fn position(&self) -> i32;

        /// Step size (microns) for the focuser.
        #[http("stepsize", method = Get)]
        fn step_size(&self) -> f64;

        /// The state of temperature compensation mode (if available), else always False.
        #[http("tempcomp", method = Get)]
        fn temp_comp(&self) -> bool;

        /// Sets the state of temperature compensation mode.
        #[http("tempcomp", method = Put)]
        fn set_temp_comp(&self, #[http("TempComp")] temp_comp: bool);

        /// True if focuser has temperature compensation available.
        #[http("tempcompavailable", method = Get)]
        fn temp_comp_available(&self) -> bool;

        /// Current ambient temperature as measured by the focuser.
        #[http("temperature", method = Get)]
        fn temperature(&self) -> f64;

        /// Immediately stop any focuser motion due to a previous [`move_`](Self::move_) method call.
        #[http("halt", method = Put)]
        fn halt(&self);

        /// Moves the focuser by the specified amount or to the specified position depending on the value of the [`absolute`](Self::absolute) property.
        #[http("move", method = Put)]
        fn move_(&self, #[http("Position")] position: i32);
    }
}
