mod client;
pub use client::decode_image_bytes;

use bytemuck::{Pod, Zeroable};
use ndarray::{Array3, Axis};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::num::NonZeroU32;

/// Rank of an image array.
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr, TryFromPrimitive,
)]
#[repr(i32)]
pub enum ImageArrayRank {
    /// 2D
    Rank2 = 2,
    /// 3D
    Rank3 = 3,
}

/// Element type of an image, as sent by the server or used on the wire.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum ImageElementType {
    /// Unknown or not set.
    Unknown = 0,
    /// `i16`
    Int16 = 1,
    /// `i32`
    Int32 = 2,
    /// `f64`
    Double = 3,
    /// `f32`
    Single = 4,
    /// `u64`
    UInt64 = 5,
    /// `u8`
    Byte = 6,
    /// `i64`
    Int64 = 7,
    /// `u16`
    UInt16 = 8,
    /// `u32`
    UInt32 = 9,
}

/// Description of a binary image payload.
///
/// Only produced by a binary (`application/imagebytes`) transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Version of the binary header layout. Always 1.
    pub metadata_version: i32,
    /// Element type of the image on the device.
    pub image_element_type: ImageElementType,
    /// Element type used for the transfer.
    pub transmission_element_type: ImageElementType,
    /// Array rank.
    pub rank: ImageArrayRank,
    /// First dimension extent.
    pub dimension_1: usize,
    /// Second dimension extent.
    pub dimension_2: usize,
    /// Third dimension extent, 0 for rank 2 images.
    pub dimension_3: usize,
}

/// Pixel values of an image.
///
/// Always 3D: rank 2 images have a third axis of length 1.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum ImageData {
    /// Integer pixels (any integer transmission type).
    Integer(Array3<i32>),
    /// Floating-point pixels (`Single` or `Double` transmission).
    Float(Array3<f64>),
}

pub(crate) const COLOUR_AXIS: Axis = Axis(2);

impl ImageData {
    /// Shape of the data as `[dimension_1, dimension_2, planes]`.
    pub fn shape(&self) -> [usize; 3] {
        let shape = match self {
            Self::Integer(data) => data.dim(),
            Self::Float(data) => data.dim(),
        };
        [shape.0, shape.1, shape.2]
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(data) => data.len(),
            Self::Float(data) => data.len(),
        }
    }

    /// Whether there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Image retrieved from a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArray {
    /// Pixel values.
    pub data: ImageData,
    /// Element type reported by the server.
    pub element_type: ImageElementType,
    /// Binary header of the payload, `None` when the server answered with JSON.
    pub metadata: Option<ImageMetadata>,
}

impl ImageArray {
    /// Retrieve actual rank of the image.
    ///
    /// Taken from the binary header when there is one, otherwise inferred from the shape.
    pub fn rank(&self) -> ImageArrayRank {
        if let Some(metadata) = &self.metadata {
            return metadata.rank;
        }
        match self.data.shape()[COLOUR_AXIS.index()] {
            1 => ImageArrayRank::Rank2,
            _ => ImageArrayRank::Rank3,
        }
    }
}

#[cfg(not(target_endian = "little"))]
compile_error!(
    "Image handling is currently only supported on little-endian platforms for simplicity & performance."
);

/// The fixed 44-byte header of a binary image payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Zeroable, Pod)]
struct ImageBytesMetadata {
    metadata_version: i32,
    error_number: i32,
    client_transaction_id: Option<NonZeroU32>,
    server_transaction_id: Option<NonZeroU32>,
    data_start: i32,
    image_element_type: i32,
    transmission_element_type: i32,
    rank: i32,
    dimension_1: i32,
    dimension_2: i32,
    dimension_3: i32,
}

const HEADER_LEN: usize = size_of::<ImageBytesMetadata>();
