//! Image decoding abstraction.

use std::fmt::{self, Debug};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Recognizes `png`, `jpg`, `jpeg` and `gif`, with an optional leading dot
    /// or `image/` mime prefix, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        let tag = tag.strip_prefix("image/").unwrap_or(&tag);
        let tag = tag.strip_prefix('.').unwrap_or(tag);
        match tag {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to decode {format} image: {message}")]
pub struct DecodeError {
    pub format: ImageFormat,
    pub message: String,
}

impl DecodeError {
    pub fn new(format: ImageFormat, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
}

impl ColorSpace {
    pub fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRgb => "DeviceRGB",
            ColorSpace::DeviceCmyk => "DeviceCMYK",
        }
    }
}

/// The filter the encoded `data` of a [`DecodedImage`] must be read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    /// Baseline JPEG passed through untouched.
    Dct,
    /// zlib-compressed samples.
    Flate,
}

impl ImageFilter {
    pub fn pdf_name(self) -> &'static str {
        match self {
            ImageFilter::Dct => "DCTDecode",
            ImageFilter::Flate => "FlateDecode",
        }
    }
}

/// An image ready to be written as an image XObject.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub bits_per_component: u8,
    pub filter: ImageFilter,
    pub data: Vec<u8>,
    /// zlib-compressed 8-bit alpha channel, if the source had transparency.
    pub soft_mask: Option<Vec<u8>>,
}

pub trait ImageDecoder: Send + Sync + Debug {
    /// Validates `bytes` as `format` and converts them into PDF-ready samples.
    fn decode(&self, bytes: &[u8], format: ImageFormat) -> Result<DecodedImage, DecodeError>;
}
