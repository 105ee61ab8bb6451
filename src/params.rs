use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;

/// HTTP verb of an Alpaca operation.
///
/// `Get` reads a property and sends arguments in the query string,
/// `Put` writes a property or invokes a method and sends a form-encoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Method {
    /// Read.
    #[display("GET")]
    Get,
    /// Write.
    #[display("PUT")]
    Put,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Put => Self::PUT,
        }
    }
}

/// A value that can be sent as an Alpaca request argument.
pub trait ASCOMParam {
    /// Render the value the way Alpaca servers expect it on the wire.
    fn to_param(self) -> String;
}

impl ASCOMParam for String {
    fn to_param(self) -> String {
        self
    }
}

impl ASCOMParam for &str {
    fn to_param(self) -> String {
        self.to_owned()
    }
}

impl ASCOMParam for bool {
    fn to_param(self) -> String {
        (if self { "True" } else { "False" }).to_owned()
    }
}

macro_rules! simple_ascom_param {
    ($($ty:ty),*) => {
        $(
            impl ASCOMParam for $ty {
                fn to_param(self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

simple_ascom_param!(i32, u32, usize, f64);

/// Implements [`ASCOMParam`] for a `#[repr(i32)]` enum via its discriminant.
macro_rules! ascom_enum_param {
    ($($name:ty),* $(,)?) => {
        $(
            impl $crate::params::ASCOMParam for $name {
                fn to_param(self) -> String {
                    $crate::params::ASCOMParam::to_param(i32::from(self))
                }
            }
        )*
    };
}
pub(crate) use ascom_enum_param;

/// Named arguments of a single Alpaca call, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OpaqueParams(IndexMap<Cow<'static, str>, String>);

impl OpaqueParams {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument.
    ///
    /// Argument names are case-insensitive on the server side, so the name is
    /// sent exactly as given.
    pub fn insert(&mut self, name: impl Into<Cow<'static, str>>, value: impl ASCOMParam) {
        let prev_value = self.0.insert(name.into(), value.to_param());
        debug_assert!(prev_value.is_none());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl ASCOMParam) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an argument by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
