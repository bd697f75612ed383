pub mod font;
pub mod image;

pub use font::{FontDescriptor, FontError, FontMetrics, SharedFontMetrics};
pub use image::{ColorSpace, DecodeError, DecodedImage, ImageDecoder, ImageFilter, ImageFormat};
