//! Image decoding for the folio PDF engine.
//!
//! JPEG data is passed through untouched and read by the viewer with
//! `DCTDecode`. PNG and GIF are decoded to 8-bit samples, recompressed with
//! zlib, and any alpha channel is split off into a soft mask.

use folio_traits::{ColorSpace, DecodeError, DecodedImage, ImageDecoder, ImageFilter, ImageFormat};
use folio_writer::deflate;
use image::{ColorType, DynamicImage};

/// The default [`ImageDecoder`], backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterDecoder;

impl RasterDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8], format: ImageFormat) -> Result<DecodedImage, DecodeError> {
        let decoded = image::load_from_memory_with_format(bytes, codec_format(format))
            .map_err(|e| DecodeError::new(format, e.to_string()))?;

        let image = match format {
            ImageFormat::Jpeg => passthrough_jpeg(bytes, &decoded),
            ImageFormat::Png | ImageFormat::Gif => {
                resample(&decoded).map_err(|e| DecodeError::new(format, e.to_string()))?
            }
        };
        log::debug!(
            "Decoded {} image: {}x{} {} (soft mask: {})",
            format,
            image.width,
            image.height,
            image.color_space.pdf_name(),
            image.soft_mask.is_some()
        );
        Ok(image)
    }
}

fn codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Gif => image::ImageFormat::Gif,
    }
}

fn passthrough_jpeg(bytes: &[u8], decoded: &DynamicImage) -> DecodedImage {
    let color_space = match decoded.color() {
        ColorType::L8 | ColorType::L16 => ColorSpace::DeviceGray,
        _ => ColorSpace::DeviceRgb,
    };
    DecodedImage {
        width: decoded.width(),
        height: decoded.height(),
        color_space,
        bits_per_component: 8,
        filter: ImageFilter::Dct,
        data: bytes.to_vec(),
        soft_mask: None,
    }
}

fn resample(decoded: &DynamicImage) -> std::io::Result<DecodedImage> {
    let color = decoded.color();
    let gray = matches!(color, ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16);

    let (color_space, samples) = if gray {
        (ColorSpace::DeviceGray, decoded.to_luma8().into_raw())
    } else {
        (ColorSpace::DeviceRgb, decoded.to_rgb8().into_raw())
    };

    let soft_mask = if color.has_alpha() {
        let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p.0[3]).collect();
        if alpha.iter().all(|a| *a == u8::MAX) {
            None
        } else {
            Some(deflate(&alpha)?)
        }
    } else {
        None
    };

    Ok(DecodedImage {
        width: decoded.width(),
        height: decoded.height(),
        color_space,
        bits_per_component: 8,
        filter: ImageFilter::Flate,
        data: deflate(&samples)?,
        soft_mask,
    })
}
