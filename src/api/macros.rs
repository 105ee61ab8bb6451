/// Generates blocking client methods from a table of Alpaca operations.
///
/// Each entry names the lower-case operation path, the verb, the wire name of
/// every argument and, optionally, a `via` type used for the wire
/// representation of the value (converted with `From`/`Into`).
#[cfg_attr(not(feature = "all-devices"), allow(unused_macro_rules))]
macro_rules! rpc_device {
    (@ret) => { () };
    (@ret $ret:ty) => { $ret };

    (@param $param:ident) => { $param };
    (@param $param:ident $via:ty) => { <$via>::from($param) };

    (@call $self:ident $method:ident $path:literal $params:ident) => {
        $self.exec_action($crate::params::Method::$method, $path, $params)
    };
    (@call $self:ident $method:ident $path:literal $params:ident $via:ty) => {
        $self
            .exec_action::<$via>($crate::params::Method::$method, $path, $params)
            .map(Into::into)
    };

    (@methods
        $(
            $(#[doc = $doc:literal])*
            #[http($path:literal, method = $method:ident $(, via = $via:ty)?)]
            $(# $method_attr:tt)*
            fn $name:ident(
                &self $(, #[http($param_name:literal $(, via = $param_via:ty)?)] $param:ident: $param_ty:ty)* $(,)?
            ) $(-> $ret:ty)?;
        )*
    ) => {
        $(
            $(#[doc = $doc])*
            $(# $method_attr)*
            pub fn $name(&self $(, $param: $param_ty)*) -> $crate::Result<rpc_device!(@ret $($ret)?)> {
                #[allow(unused_mut)]
                let mut params = $crate::params::OpaqueParams::new();
                $(
                    params.insert($param_name, rpc_device!(@param $param $($param_via)?));
                )*
                rpc_device!(@call self $method $path params $($via)?)
            }
        )*
    };

    (impl $name:ident { $($methods:tt)* }) => {
        impl $name {
            rpc_device!(@methods $($methods)*);
        }
    };

    (
        $(#[doc = $doc:literal])*
        $pub:vis struct $name:ident = $device_type:ident {
            $($methods:tt)*
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, derive_more::Deref)]
        $pub struct $name {
            #[deref]
            device: $crate::client::DeviceClient,
        }

        impl $name {
            /// Client for the device with the given number on this server.
            pub fn new(client: &$crate::Client, device_number: u32) -> Self {
                Self {
                    device: client.device_client($crate::api::DeviceType::$device_type, device_number),
                }
            }
        }

        rpc_device!(impl $name { $($methods)* });
    };
}

/// Declares the device modules together with the closed set of device types.
macro_rules! rpc_mod {
    ($(#[cfg(feature = $feature:literal)] $module:ident::$name:ident = $path:literal,)*) => {
        $(
            #[cfg(feature = $feature)]
            #[doc = concat!("Types related to [`", stringify!($name), "`] devices.")]
            pub mod $module;

            #[cfg(feature = $feature)]
            pub use $module::$name;
        )*

        /// Alpaca device type.
        ///
        /// Serialized by its PascalCase name, rendered lower-case in URLs.
        #[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy, Debug, derive_more::Display, serde::Serialize)]
        #[expect(missing_docs)] // self-explanatory variants
        pub enum DeviceType {
            $(
                #[display($path)]
                $name,
            )*
        }

        impl DeviceType {
            /// Every device type, in declaration order.
            pub const ALL: &[Self] = &[$(Self::$name,)*];
        }

        impl std::str::FromStr for DeviceType {
            type Err = UnknownDeviceType;

            /// Parses either the URL or the PascalCase form, ignoring case.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($path) {
                        return Ok(Self::$name);
                    }
                )*
                Err(UnknownDeviceType(s.to_owned()))
            }
        }

        impl<'de> serde::Deserialize<'de> for DeviceType {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = <String as serde::Deserialize>::deserialize(deserializer)?;
                name.parse().map_err(serde::de::Error::custom)
            }
        }

        /// A tagged wrapper for a client of any device type.
        #[derive(Clone, Debug)]
        #[expect(missing_docs)] // self-explanatory variants
        pub enum TypedDevice {
            $(
                #[cfg(feature = $feature)]
                $name($name),
            )*
        }

        impl TypedDevice {
            /// Client for device `device_number` of the given type.
            ///
            /// Returns `None` if support for that type is compiled out.
            pub fn new(client: &$crate::Client, device_type: DeviceType, device_number: u32) -> Option<Self> {
                match device_type {
                    $(
                        #[cfg(feature = $feature)]
                        DeviceType::$name => Some(Self::$name($name::new(client, device_number))),
                    )*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            /// Type of the wrapped device.
            pub const fn device_type(&self) -> DeviceType {
                match self {
                    $(
                        #[cfg(feature = $feature)]
                        Self::$name(_) => DeviceType::$name,
                    )*
                }
            }
        }

        impl std::ops::Deref for TypedDevice {
            type Target = $crate::client::DeviceClient;

            fn deref(&self) -> &Self::Target {
                match self {
                    $(
                        #[cfg(feature = $feature)]
                        Self::$name(device) => std::ops::Deref::deref(device),
                    )*
                }
            }
        }
    };
}
