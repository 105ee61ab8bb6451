use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Alpaca representation of an ASCOM error code.
///
/// Alpaca transmits error numbers as `int32`, so values outside the ASCOM
/// range (e.g. COM `HRESULT`s passed through by Windows drivers) are kept as is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ASCOMErrorCode(i32);

/// The starting value for driver-specific error numbers.
const DRIVER_BASE: i32 = 0x500;
/// The maximum value for error numbers.
const MAX: i32 = 0xFFF;

impl ASCOMErrorCode {
    /// Wrap a raw error number as received from the server.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Generate ASCOM error code from a zero-based driver error code.
    ///
    /// Will panic if the driver error code is larger than the maximum allowed (2815).
    #[allow(clippy::as_conversions, clippy::cast_lossless)]
    pub const fn new_for_driver(driver_code: u16) -> Self {
        const DRIVER_MAX: i32 = MAX - DRIVER_BASE;

        let driver_code = driver_code as i32;
        assert!(driver_code <= DRIVER_MAX, "Driver error code is too large");

        Self(driver_code + DRIVER_BASE)
    }

    /// Get the driver-specific error code.
    ///
    /// Returns `Ok` with `0`-based driver error code if this is a driver error.
    /// Returns `Err` with raw error code if not a driver error.
    #[allow(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub const fn as_driver_error(self) -> std::result::Result<u16, i32> {
        if self.0 >= DRIVER_BASE && self.0 <= MAX {
            // 0..=0xAFF after the range check
            Ok((self.0 - DRIVER_BASE) as u16)
        } else {
            Err(self.0)
        }
    }

    /// Get the raw error code.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Classify the code into one of the known error kinds.
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::NOT_IMPLEMENTED => ErrorKind::NotImplemented,
            Self::INVALID_VALUE => ErrorKind::InvalidValue,
            Self::VALUE_NOT_SET => ErrorKind::ValueNotSet,
            Self::NOT_CONNECTED => ErrorKind::NotConnected,
            Self::INVALID_WHILE_PARKED => ErrorKind::Parked,
            Self::INVALID_WHILE_SLAVED => ErrorKind::Slaved,
            Self::INVALID_OPERATION => ErrorKind::InvalidOperation,
            Self::ACTION_NOT_IMPLEMENTED => ErrorKind::ActionNotImplemented,
            Self::OPERATION_CANCELLED => ErrorKind::OperationCancelled,
            _ if self.as_driver_error().is_ok() => ErrorKind::Driver,
            _ => ErrorKind::Unknown,
        }
    }
}

impl From<ASCOMErrorCode> for i32 {
    fn from(code: ASCOMErrorCode) -> Self {
        code.0
    }
}

impl fmt::LowerHex for ASCOMErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Kind of a protocol-level error, derived from its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operation or property not supported by this device (0x400).
    NotImplemented,
    /// Argument out of allowed range (0x401).
    InvalidValue,
    /// Required value not yet established (0x402).
    ValueNotSet,
    /// Device not connected (0x407).
    NotConnected,
    /// Device is parked (0x408).
    Parked,
    /// Device is slaved (0x409).
    Slaved,
    /// Operation not valid in current state (0x40B).
    InvalidOperation,
    /// Named custom action not supported (0x40C).
    ActionNotImplemented,
    /// Operation was cancelled (0x40E).
    OperationCancelled,
    /// Device-specific driver error (0x500 - 0xFFF).
    Driver,
    /// Any other code.
    Unknown,
}

/// ASCOM error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} (Error Code: {code:#x})")]
pub struct ASCOMError {
    /// Error number.
    #[serde(rename = "ErrorNumber", default = "ASCOMError::ok_code")]
    pub code: ASCOMErrorCode,
    /// Error message.
    #[serde(rename = "ErrorMessage", default)]
    pub message: Cow<'static, str>,
}

impl ASCOMError {
    /// Create a new `ASCOMError` from given error code and a message.
    pub fn new(code: ASCOMErrorCode, message: impl fmt::Display) -> Self {
        Self {
            code,
            message: message.to_string().into(),
        }
    }

    /// Numeric error code.
    pub const fn code(&self) -> ASCOMErrorCode {
        self.code
    }

    /// Human-readable message as sent by the server.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error kind derived from the code.
    pub const fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    const fn ok_code() -> ASCOMErrorCode {
        ASCOMErrorCode::OK
    }
}

/// Result type for ASCOM methods.
pub type ASCOMResult<T = ()> = std::result::Result<T, ASCOMError>;

macro_rules! ascom_error_codes {
    ($(#[doc = $doc:literal] $name:ident = $value:literal,)*) => {
        impl ASCOMErrorCode {
            $(
                #[doc = $doc]
                pub const $name: Self = Self($value);
            )*
        }

        impl fmt::Debug for ASCOMErrorCode {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match *self {
                    $(
                        Self::$name => f.write_str(stringify!($name)),
                    )*
                    _ => match self.as_driver_error() {
                        Ok(driver_code) => write!(f, "DRIVER_ERROR[{driver_code}]"),
                        Err(raw_code) => write!(f, "{raw_code:#X}"),
                    },
                }
            }
        }

        impl fmt::Display for ASCOMErrorCode {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

ascom_error_codes! {
    #[doc = "Success"]
    OK = 0,
    #[doc = "Property or method not implemented"]
    NOT_IMPLEMENTED = 0x400,
    #[doc = "Invalid value"]
    INVALID_VALUE = 0x401,
    #[doc = "A value has not been set"]
    VALUE_NOT_SET = 0x402,
    #[doc = "The communications channel is not connected"]
    NOT_CONNECTED = 0x407,
    #[doc = "The attempted operation is invalid because the mount is currently in a Parked state"]
    INVALID_WHILE_PARKED = 0x408,
    #[doc = "The attempted operation is invalid because the mount is currently in a Slaved state"]
    INVALID_WHILE_SLAVED = 0x409,
    #[doc = "The requested operation can not be undertaken at this time"]
    INVALID_OPERATION = 0x40B,
    #[doc = "The requested action is not implemented in this driver"]
    ACTION_NOT_IMPLEMENTED = 0x40C,
    #[doc = "The operation was cancelled before it completed"]
    OPERATION_CANCELLED = 0x40E,
}

/// Non-2xx HTTP status returned by the Alpaca server.
///
/// The code is the HTTP status; the message combines the reason phrase,
/// the response body and the requested URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (Error Code: {status:#x})")]
pub struct AlpacaRequestError {
    /// HTTP status code.
    pub status: u16,
    /// URL that was requested.
    pub url: String,
    /// Reason phrase, body and URL.
    pub message: String,
}

impl AlpacaRequestError {
    pub(crate) fn new(status: u16, reason: &str, body: &str, url: &str) -> Self {
        Self {
            status,
            url: url.to_owned(),
            message: format!("{reason}: {body} (URL {url})"),
        }
    }

    /// HTTP status code.
    pub const fn code(&self) -> u16 {
        self.status
    }

    /// Reason phrase, body and URL.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Any failure of an Alpaca call.
#[derive(Debug, Error)]
pub enum Error {
    /// The server processed the request and reported a protocol error.
    #[error(transparent)]
    Ascom(#[from] ASCOMError),
    /// The server answered with a non-2xx HTTP status.
    #[error(transparent)]
    Request(#[from] AlpacaRequestError),
    /// The request couldn't be delivered or the response couldn't be read.
    #[error("HTTP transport failure: {0}")]
    Http(#[from] reqwest::Error),
    /// The response arrived but couldn't be decoded.
    #[error("Malformed Alpaca response: {0:#}")]
    Decode(eyre::Report),
    /// Discovery socket failure.
    #[error("Discovery I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Protocol error kind, if this is a protocol error.
    pub const fn ascom_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Ascom(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl From<eyre::Report> for Error {
    fn from(report: eyre::Report) -> Self {
        Self::Decode(report)
    }
}

/// Result type for client calls.
pub type Result<T = ()> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::{ASCOMError, ASCOMErrorCode, AlpacaRequestError, Error, ErrorKind};

    const MESSAGE: &str = "qwertyuiopas";

    #[test]
    fn every_known_code_maps_to_its_kind() {
        let table = [
            (0x400, ErrorKind::NotImplemented),
            (0x401, ErrorKind::InvalidValue),
            (0x402, ErrorKind::ValueNotSet),
            (0x407, ErrorKind::NotConnected),
            (0x408, ErrorKind::Parked),
            (0x409, ErrorKind::Slaved),
            (0x40B, ErrorKind::InvalidOperation),
            (0x40C, ErrorKind::ActionNotImplemented),
            (0x40E, ErrorKind::OperationCancelled),
            (0x500, ErrorKind::Driver),
            (0x54F, ErrorKind::Driver),
            (0x5FF, ErrorKind::Driver),
            (0x403, ErrorKind::Unknown),
            (0x4FF, ErrorKind::Unknown),
        ];

        for (raw, kind) in table {
            let err = ASCOMError::new(ASCOMErrorCode::new(raw), MESSAGE);
            assert_eq!(err.kind(), kind, "code {raw:#x}");
            assert_eq!(err.code().raw(), raw);
            assert_eq!(err.message(), MESSAGE);
            assert_eq!(err.to_string(), format!("{MESSAGE} (Error Code: {raw:#x})"));
        }
    }

    #[test]
    fn display_uses_lowercase_hex() {
        let err = ASCOMError::new(ASCOMErrorCode::OPERATION_CANCELLED, "stopped");
        assert_eq!(err.to_string(), "stopped (Error Code: 0x40e)");
    }

    #[test]
    fn driver_codes_round_trip() {
        let code = ASCOMErrorCode::new_for_driver(0x4F);
        assert_eq!(code.raw(), 0x54F);
        assert_eq!(code.as_driver_error(), Ok(0x4F));
        assert_eq!(ASCOMErrorCode::NOT_CONNECTED.as_driver_error(), Err(0x407));
        assert_eq!(format!("{code:?}"), "DRIVER_ERROR[79]");
    }

    #[test]
    fn codes_outside_ascom_range_keep_message() -> eyre::Result<()> {
        let err = serde_json::from_str::<ASCOMError>(
            r#"{"ErrorNumber": -2147220224, "ErrorMessage": "COM failure"}"#,
        )?;
        assert_eq!(err.code().raw(), -2_147_220_224);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.message(), "COM failure");
        assert_eq!(err.to_string(), "COM failure (Error Code: 0x80040500)");

        let err = serde_json::from_str::<ASCOMError>(
            r#"{"ErrorNumber": 70000, "ErrorMessage": "too big"}"#,
        )?;
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.to_string(), "too big (Error Code: 0x11170)");
        Ok(())
    }

    #[test]
    fn request_error_carries_status() {
        let err = AlpacaRequestError::new(
            500,
            "Internal Server Error",
            "boom",
            "http://127.0.0.1/api/v1/camera/0/binx",
        );
        assert_eq!(err.code(), 500);
        assert_eq!(
            err.to_string(),
            "Internal Server Error: boom (URL http://127.0.0.1/api/v1/camera/0/binx) (Error Code: 0x1f4)"
        );
    }

    #[test]
    fn envelope_without_error_fields_is_ok() -> eyre::Result<()> {
        let err = serde_json::from_str::<ASCOMError>(r#"{"Value": 1}"#)?;
        assert_eq!(err.code, ASCOMErrorCode::OK);
        assert!(err.message.is_empty());
        Ok(())
    }

    #[test]
    fn wrapped_protocol_error_keeps_kind() {
        let err = Error::from(ASCOMError::new(ASCOMErrorCode::INVALID_WHILE_PARKED, "parked"));
        assert_eq!(err.ascom_kind(), Some(ErrorKind::Parked));
        assert_eq!(err.to_string(), "parked (Error Code: 0x408)");
    }
}
