use super::{ResponseTransaction, ResponseWithTransaction};
use crate::response::ValueResponse;
use crate::{ASCOMError, ASCOMErrorCode, ASCOMResult};
use mime::Mime;
use reqwest::blocking::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::de::value::UnitDeserializer;
use std::any::TypeId;

pub(crate) const IMAGE_BYTES_TYPE: &str = "application/imagebytes";

/// Decoding of one successful (200-203) HTTP response body.
pub(crate) trait Response: Sized {
    fn prepare_reqwest(request: RequestBuilder) -> RequestBuilder {
        request
    }

    fn from_reqwest(
        mime_type: Option<&Mime>,
        bytes: &[u8],
    ) -> eyre::Result<ResponseWithTransaction<Self>>;
}

pub(crate) fn is_image_bytes(mime_type: Option<&Mime>) -> bool {
    mime_type.is_some_and(|mime_type| mime_type.essence_str() == IMAGE_BYTES_TYPE)
}

impl ResponseTransaction {
    pub(crate) fn from_json(bytes: &[u8]) -> eyre::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Parses the JSON envelope, returning the embedded error if `ErrorNumber` is set.
pub(crate) fn parse_envelope(bytes: &[u8]) -> eyre::Result<ResponseWithTransaction<ASCOMResult>> {
    let transaction = ResponseTransaction::from_json(bytes)?;
    let ascom_error = serde_json::from_slice::<ASCOMError>(bytes)?;
    Ok(ResponseWithTransaction {
        transaction,
        response: match ascom_error.code {
            ASCOMErrorCode::OK => Ok(()),
            _ => Err(ascom_error),
        },
    })
}

fn parse_value<T: 'static + DeserializeOwned>(bytes: &[u8]) -> eyre::Result<T> {
    if TypeId::of::<T>() == TypeId::of::<()>() {
        // unit operations ignore whatever `Value` the server sends
        return Ok(T::deserialize(UnitDeserializer::<serde_json::Error>::new())?);
    }
    match serde_json::from_slice::<ValueResponse<T>>(bytes)?.into_value() {
        Some(value) => Ok(value),
        // `null` or absent, let the target type decide whether that's acceptable
        None => Ok(T::deserialize(UnitDeserializer::<serde_json::Error>::new())?),
    }
}

impl<T: 'static + DeserializeOwned> Response for ASCOMResult<T> {
    fn from_reqwest(
        mime_type: Option<&Mime>,
        bytes: &[u8],
    ) -> eyre::Result<ResponseWithTransaction<Self>> {
        eyre::ensure!(
            !is_image_bytes(mime_type),
            "Received {IMAGE_BYTES_TYPE} payload for an operation that doesn't return an image"
        );
        let ResponseWithTransaction {
            transaction,
            response,
        } = parse_envelope(bytes)?;
        Ok(ResponseWithTransaction {
            transaction,
            response: match response {
                Ok(()) => Ok(parse_value(bytes)?),
                Err(err) => Err(err),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Response;
    use crate::errors::ErrorKind;
    use crate::ASCOMResult;

    fn decode<T: 'static + serde::de::DeserializeOwned>(
        json: &str,
    ) -> eyre::Result<ASCOMResult<T>> {
        let mime = mime::APPLICATION_JSON;
        Ok(ASCOMResult::<T>::from_reqwest(Some(&mime), json.as_bytes())?.response)
    }

    #[test]
    fn value_is_returned_unmodified() -> eyre::Result<()> {
        let json = r#"{"Value":{"b":[1,2.5,"x"],"a":null},"ErrorNumber":0,"ErrorMessage":"","ClientTransactionID":3,"ServerTransactionID":9}"#;
        let value = decode::<serde_json::Value>(json)??;
        assert_eq!(value, serde_json::json!({"b": [1, 2.5, "x"], "a": null}));
        Ok(())
    }

    #[test]
    fn non_zero_error_number_is_protocol_error() -> eyre::Result<()> {
        let json = r#"{"Value":0,"ErrorNumber":1032,"ErrorMessage":"Mount is parked"}"#;
        let err = decode::<f64>(json)?.expect_err("must be an error");
        assert_eq!(err.kind(), ErrorKind::Parked);
        assert_eq!(err.message(), "Mount is parked");
        Ok(())
    }

    #[test]
    fn unit_ignores_value() -> eyre::Result<()> {
        decode::<()>(r#"{"Value":"whatever","ErrorNumber":0}"#)??;
        decode::<()>(r#"{"ErrorNumber":0,"ErrorMessage":""}"#)??;
        Ok(())
    }

    #[test]
    fn missing_value_for_option() -> eyre::Result<()> {
        assert_eq!(decode::<Option<i32>>(r#"{"ErrorNumber":0}"#)??, None);
        Ok(())
    }

    #[test]
    fn missing_value_for_number_is_decode_error() {
        assert!(decode::<i32>(r#"{"ErrorNumber":0}"#).is_err());
    }

    #[test]
    fn image_bytes_rejected_for_plain_values() {
        let mime = super::IMAGE_BYTES_TYPE
            .parse::<mime::Mime>()
            .expect("valid mime type");
        assert!(ASCOMResult::<i32>::from_reqwest(Some(&mime), &[0; 44]).is_err());
    }
}
