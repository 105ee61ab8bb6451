use super::{
    COLOUR_AXIS, HEADER_LEN, ImageArray, ImageArrayRank, ImageBytesMetadata, ImageData,
    ImageElementType, ImageMetadata,
};
use crate::client::{
    IMAGE_BYTES_TYPE, Response, ResponseTransaction, ResponseWithTransaction, is_image_bytes,
    parse_envelope,
};
use crate::{ASCOMError, ASCOMErrorCode, ASCOMResult};
use bytemuck::{Pod, pod_read_unaligned};
use eyre::WrapErr;
use mime::Mime;
use ndarray::{Array2, Array3, Ix3};
use num_enum::TryFromPrimitive;
use reqwest::blocking::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_ndim::de::MakeNDim;

/// Offset of the error number within the binary header.
const ERROR_NUMBER_AT: usize = 4;

fn read_transaction(bytes: &[u8]) -> ResponseTransaction {
    bytes
        .get(..HEADER_LEN)
        .map(pod_read_unaligned::<ImageBytesMetadata>)
        .map_or_else(ResponseTransaction::default, |header| ResponseTransaction {
            client_transaction_id: header.client_transaction_id,
            server_transaction_id: header.server_transaction_id,
        })
}

/// Reinterpret the raw element data and reshape it.
///
/// The last index varies fastest.
fn collect_elements<T: Pod, U>(
    raw_data: &[u8],
    shape: Ix3,
    convert: impl Fn(T) -> eyre::Result<U>,
) -> eyre::Result<Array3<U>> {
    let (dimension_1, dimension_2, planes) = (shape[0], shape[1], shape[2]);
    let len = dimension_1
        .checked_mul(dimension_2)
        .and_then(|len| len.checked_mul(planes))
        .ok_or_else(|| eyre::eyre!("image dimensions {shape:?} overflow"))?;
    let expected_bytes = len
        .checked_mul(size_of::<T>())
        .ok_or_else(|| eyre::eyre!("image dimensions {shape:?} overflow"))?;
    eyre::ensure!(
        raw_data.len() == expected_bytes,
        "image dimensions {dimension_1}x{dimension_2}x{planes} need {expected_bytes} bytes, got {}",
        raw_data.len(),
    );
    let values = raw_data
        .chunks_exact(size_of::<T>())
        .map(|chunk| convert(pod_read_unaligned::<T>(chunk)))
        .collect::<eyre::Result<Vec<U>>>()?;
    Ok(Array3::from_shape_vec(shape, values)?)
}

fn narrow<T: Copy + std::fmt::Display + TryInto<i32, Error = std::num::TryFromIntError>>(
    value: T,
) -> eyre::Result<i32> {
    value
        .try_into()
        .wrap_err_with(|| format!("pixel value {value} doesn't fit into i32"))
}

fn decode_binary(bytes: &[u8]) -> eyre::Result<ResponseWithTransaction<ASCOMResult<ImageArray>>> {
    let error_number = bytes
        .get(ERROR_NUMBER_AT..ERROR_NUMBER_AT + size_of::<i32>())
        .map(pod_read_unaligned::<i32>)
        .ok_or_else(|| eyre::eyre!("not enough bytes to read the error number"))?;

    if error_number != 0_i32 {
        let message = String::from_utf8_lossy(bytes.get(HEADER_LEN..).unwrap_or_default());
        return Ok(ResponseWithTransaction {
            transaction: read_transaction(bytes),
            response: Err(ASCOMError::new(ASCOMErrorCode::new(error_number), message)),
        });
    }

    let header = bytes
        .get(..HEADER_LEN)
        .map(pod_read_unaligned::<ImageBytesMetadata>)
        .ok_or_else(|| eyre::eyre!("not enough bytes to read image metadata"))?;
    eyre::ensure!(
        header.metadata_version == 1_i32,
        "unsupported metadata version {}",
        header.metadata_version,
    );
    let data_start = usize::try_from(header.data_start)?;
    eyre::ensure!(
        data_start >= HEADER_LEN,
        "image data start offset is within metadata",
    );
    let raw_data = bytes
        .get(data_start..)
        .ok_or_else(|| eyre::eyre!("image data start offset is out of bounds"))?;

    let image_element_type = ImageElementType::try_from_primitive(header.image_element_type)?;
    let transmission_element_type =
        ImageElementType::try_from_primitive(header.transmission_element_type)?;
    let rank = ImageArrayRank::try_from_primitive(header.rank)?;

    let dimension = |value: i32| {
        usize::try_from(value).wrap_err_with(|| format!("invalid image dimension {value}"))
    };
    let dimension_1 = dimension(header.dimension_1)?;
    let dimension_2 = dimension(header.dimension_2)?;
    let dimension_3 = dimension(header.dimension_3)?;
    let planes = match rank {
        ImageArrayRank::Rank2 => {
            eyre::ensure!(
                dimension_3 == 0,
                "dimension 3 must be 0 for rank 2, got {dimension_3}",
            );
            1
        }
        ImageArrayRank::Rank3 => dimension_3,
    };
    let shape = Ix3(dimension_1, dimension_2, planes);

    let data: ImageData = match transmission_element_type {
        ImageElementType::Byte => collect_elements(raw_data, shape, |v: u8| Ok(i32::from(v)))?.into(),
        ImageElementType::Int16 => collect_elements(raw_data, shape, |v: i16| Ok(i32::from(v)))?.into(),
        ImageElementType::UInt16 => collect_elements(raw_data, shape, |v: u16| Ok(i32::from(v)))?.into(),
        ImageElementType::Int32 => collect_elements(raw_data, shape, |v: i32| Ok(v))?.into(),
        ImageElementType::UInt32 => collect_elements(raw_data, shape, narrow::<u32>)?.into(),
        ImageElementType::Int64 => collect_elements(raw_data, shape, narrow::<i64>)?.into(),
        ImageElementType::UInt64 => collect_elements(raw_data, shape, narrow::<u64>)?.into(),
        ImageElementType::Single => collect_elements(raw_data, shape, |v: f32| Ok(f64::from(v)))?.into(),
        ImageElementType::Double => collect_elements(raw_data, shape, |v: f64| Ok(v))?.into(),
        ImageElementType::Unknown => eyre::bail!("unknown transmission element type"),
    };

    Ok(ResponseWithTransaction {
        transaction: ResponseTransaction {
            client_transaction_id: header.client_transaction_id,
            server_transaction_id: header.server_transaction_id,
        },
        response: Ok(ImageArray {
            data,
            element_type: image_element_type,
            metadata: Some(ImageMetadata {
                metadata_version: header.metadata_version,
                image_element_type,
                transmission_element_type,
                rank,
                dimension_1,
                dimension_2,
                dimension_3,
            }),
        }),
    })
}

/// Decode a binary `application/imagebytes` payload.
///
/// A payload carrying a non-zero error number yields [`Error::Ascom`](crate::Error::Ascom)
/// without looking at the pixel data; a malformed header yields
/// [`Error::Decode`](crate::Error::Decode).
pub fn decode_image_bytes(bytes: &[u8]) -> crate::Result<ImageArray> {
    Ok(decode_binary(bytes)?.response?)
}

#[derive(Deserialize)]
struct JsonImageHeader {
    #[serde(rename = "Type")]
    element_type: ImageElementType,
    #[serde(rename = "Rank")]
    rank: ImageArrayRank,
}

#[derive(Deserialize)]
struct JsonImageValue<A: MakeNDim<Item: DeserializeOwned>> {
    #[serde(rename = "Value", with = "serde_ndim")]
    value: A,
}

fn parse_json_value<A: MakeNDim<Item: DeserializeOwned>>(bytes: &[u8]) -> eyre::Result<A> {
    Ok(serde_json::from_slice::<JsonImageValue<A>>(bytes)?.value)
}

/// JSON image array: `{"Type": 1|2|3, "Rank": 2|3, "Value": [...]}`.
///
/// Parsed in two passes so the key order of the server doesn't matter.
fn decode_json(bytes: &[u8]) -> eyre::Result<ImageArray> {
    let JsonImageHeader { element_type, rank } = serde_json::from_slice(bytes)?;
    let data: ImageData = match (element_type, rank) {
        // `imagearrayvariant` may report Int16; the values still fit `i32`
        (ImageElementType::Int16 | ImageElementType::Int32, ImageArrayRank::Rank2) => {
            parse_json_value::<Array2<i32>>(bytes)?.insert_axis(COLOUR_AXIS).into()
        }
        (ImageElementType::Int16 | ImageElementType::Int32, ImageArrayRank::Rank3) => {
            parse_json_value::<Array3<i32>>(bytes)?.into()
        }
        (ImageElementType::Double, ImageArrayRank::Rank2) => {
            parse_json_value::<Array2<f64>>(bytes)?.insert_axis(COLOUR_AXIS).into()
        }
        (ImageElementType::Double, ImageArrayRank::Rank3) => {
            parse_json_value::<Array3<f64>>(bytes)?.into()
        }
        (other, _) => eyre::bail!("unsupported JSON image element type {other:?}"),
    };
    Ok(ImageArray {
        data,
        element_type,
        metadata: None,
    })
}

impl Response for ASCOMResult<ImageArray> {
    fn prepare_reqwest(request: RequestBuilder) -> RequestBuilder {
        request.header(reqwest::header::ACCEPT, IMAGE_BYTES_TYPE)
    }

    fn from_reqwest(
        mime_type: Option<&Mime>,
        bytes: &[u8],
    ) -> eyre::Result<ResponseWithTransaction<Self>> {
        if is_image_bytes(mime_type) {
            return decode_binary(bytes);
        }
        let ResponseWithTransaction {
            transaction,
            response,
        } = parse_envelope(bytes)?;
        Ok(ResponseWithTransaction {
            transaction,
            response: match response {
                Ok(()) => Ok(decode_json(bytes)?),
                Err(err) => Err(err),
            },
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::super::{ImageArrayRank, ImageBytesMetadata, ImageData, ImageElementType};
    use super::{decode_image_bytes, decode_json};
    use crate::Error;
    use crate::errors::ErrorKind;
    use std::num::NonZeroU32;

    /// Build a binary payload with a well-formed header.
    pub(crate) fn image_bytes(
        transmission_element_type: ImageElementType,
        rank: i32,
        dimensions: [i32; 3],
        data: &[u8],
    ) -> Vec<u8> {
        let header = ImageBytesMetadata {
            metadata_version: 1,
            error_number: 0,
            client_transaction_id: NonZeroU32::new(5),
            server_transaction_id: NonZeroU32::new(17),
            data_start: 44,
            image_element_type: ImageElementType::Int32.into(),
            transmission_element_type: transmission_element_type.into(),
            rank,
            dimension_1: dimensions[0],
            dimension_2: dimensions[1],
            dimension_3: dimensions[2],
        };
        let mut bytes = bytemuck::bytes_of(&header).to_vec();
        bytes.extend_from_slice(data);
        bytes
    }

    fn le_bytes_i16(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn embedded_error_skips_pixel_data() {
        // header fields after the error number are nonsense on purpose
        let mut bytes = image_bytes(ImageElementType::Unknown, 99, [-1, -1, -1], &[]);
        bytes[4..8].copy_from_slice(&0x400_i32.to_le_bytes());
        bytes.extend_from_slice(b"Not implemented here");

        let err = decode_image_bytes(&bytes).expect_err("must fail");
        assert_eq!(err.ascom_kind(), Some(ErrorKind::NotImplemented));
        assert_eq!(err.to_string(), "Not implemented here (Error Code: 0x400)");
    }

    #[test]
    fn embedded_error_outside_ascom_range() {
        let mut bytes = image_bytes(ImageElementType::Int32, 2, [1, 1, 0], &[]);
        bytes[4..8].copy_from_slice(&(-2_147_220_224_i32).to_le_bytes());
        bytes.extend_from_slice(b"COM failure");

        let err = decode_image_bytes(&bytes).expect_err("must fail");
        assert_eq!(err.ascom_kind(), Some(ErrorKind::Unknown));
        assert_eq!(err.to_string(), "COM failure (Error Code: 0x80040500)");
    }

    #[test]
    fn rank2_int16() -> eyre::Result<()> {
        let bytes = image_bytes(
            ImageElementType::Int16,
            2,
            [2, 3, 0],
            &le_bytes_i16(&[0, 1, 2, -3, 4, 5]),
        );
        let image = decode_image_bytes(&bytes)?;

        let metadata = image.metadata.expect("binary decode must produce metadata");
        assert_eq!(metadata.rank, ImageArrayRank::Rank2);
        assert_eq!(metadata.dimension_1, 2);
        assert_eq!(metadata.dimension_2, 3);
        assert_eq!(metadata.transmission_element_type, ImageElementType::Int16);
        assert_eq!(image.rank(), ImageArrayRank::Rank2);
        assert_eq!(image.data.len(), 6);
        assert_eq!(image.data.shape(), [2, 3, 1]);

        let ImageData::Integer(data) = image.data else {
            eyre::bail!("expected integer data");
        };
        assert_eq!(data[[0, 2, 0]], 2);
        assert_eq!(data[[1, 0, 0]], -3);
        assert_eq!(data[[1, 2, 0]], 5);
        Ok(())
    }

    #[test]
    fn rank3_uint16() -> eyre::Result<()> {
        let values = (0..12_u16).map(|v| v * 1000).collect::<Vec<_>>();
        let raw = values.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<_>>();
        let image = decode_image_bytes(&image_bytes(ImageElementType::UInt16, 3, [2, 2, 3], &raw))?;

        assert_eq!(image.rank(), ImageArrayRank::Rank3);
        assert_eq!(image.data.shape(), [2, 2, 3]);
        let ImageData::Integer(data) = image.data else {
            eyre::bail!("expected integer data");
        };
        assert_eq!(data[[1, 1, 2]], 11_000);
        Ok(())
    }

    #[test]
    fn doubles_decode_to_float() -> eyre::Result<()> {
        let raw = [0.5_f64, -1.25].iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<_>>();
        let image = decode_image_bytes(&image_bytes(ImageElementType::Double, 2, [1, 2, 0], &raw))?;
        assert_eq!(
            image.data,
            ImageData::Float(ndarray::array![[[0.5], [-1.25]]])
        );
        Ok(())
    }

    #[test]
    fn padded_data_start() -> eyre::Result<()> {
        let mut bytes = image_bytes(ImageElementType::Byte, 2, [1, 1, 0], &[0, 0, 0, 0, 200]);
        bytes[16..20].copy_from_slice(&48_i32.to_le_bytes());
        let image = decode_image_bytes(&bytes)?;
        assert_eq!(image.data, ImageData::Integer(ndarray::array![[[200]]]));
        Ok(())
    }

    #[test]
    fn malformed_headers_are_decode_errors() {
        let cases = [
            ("rank 4", image_bytes(ImageElementType::Int16, 4, [1, 1, 1], &[0; 2])),
            ("size mismatch", image_bytes(ImageElementType::Int16, 2, [2, 3, 0], &[0; 10])),
            ("rank 2 with third dimension", image_bytes(ImageElementType::Int16, 2, [1, 1, 1], &[0; 2])),
            ("negative dimension", image_bytes(ImageElementType::Int16, 2, [-1, 1, 0], &[])),
            ("unknown transmission type", image_bytes(ImageElementType::Unknown, 2, [1, 1, 0], &[0; 4])),
            ("u32 out of range", image_bytes(ImageElementType::UInt32, 2, [1, 1, 0], &u32::MAX.to_le_bytes())),
            ("truncated header", vec![1, 0, 0, 0, 0, 0, 0, 0, 0]),
            ("no error number", vec![1, 0]),
        ];

        for (name, bytes) in cases {
            let err = decode_image_bytes(&bytes).expect_err(name);
            assert!(matches!(err, Error::Decode(_)), "{name}: {err:?}");
        }
    }

    #[test]
    fn unsupported_metadata_version() {
        let mut bytes = image_bytes(ImageElementType::Byte, 2, [1, 1, 0], &[7]);
        bytes[0..4].copy_from_slice(&2_i32.to_le_bytes());
        assert!(matches!(decode_image_bytes(&bytes), Err(Error::Decode(_))));
    }

    #[test]
    fn json_fallback_has_no_metadata() -> eyre::Result<()> {
        let image = decode_json(
            br#"{"Value":[[1,2,3],[4,5,6]],"Rank":2,"Type":2,"ErrorNumber":0,"ErrorMessage":""}"#,
        )?;
        assert_eq!(image.metadata, None);
        assert_eq!(image.rank(), ImageArrayRank::Rank2);
        assert_eq!(image.data.shape(), [2, 3, 1]);

        let image = decode_json(br#"{"Type":3,"Rank":3,"Value":[[[0.5,1.5]]]}"#)?;
        assert_eq!(image.data, ImageData::Float(ndarray::array![[[0.5, 1.5]]]));
        Ok(())
    }

    #[test]
    fn json_int16_widens_to_integer() -> eyre::Result<()> {
        let image = decode_json(br#"{"Type":1,"Rank":2,"Value":[[1,2],[3,-4]]}"#)?;
        assert_eq!(image.element_type, ImageElementType::Int16);
        assert_eq!(image.data, ImageData::Integer(ndarray::array![[[1], [2]], [[3], [-4]]]));

        let image = decode_json(br#"{"Type":1,"Rank":3,"Value":[[[1,2,3]]]}"#)?;
        assert_eq!(image.data.shape(), [1, 1, 3]);
        Ok(())
    }
}
