//! Capability traits for the image codecs the ICO decoder and encoder
//! delegate to.

use crate::error::Result;
use crate::image::IconImage;

//===========================================================================//

/// Decodes complete PNG streams.
pub trait PngDecoder {
    /// Decodes a PNG stream into straight-alpha RGBA pixels.
    fn decode_png(&self, data: &[u8]) -> Result<IconImage>;

    /// Reads just enough of a PNG stream to return its `(width, height)`.
    fn png_size(&self, data: &[u8]) -> Result<(u32, u32)>;
}

/// Encodes images as PNG streams.
pub trait PngEncoder {
    /// Encodes `image` as a complete PNG stream.
    fn encode_png(&self, image: &IconImage) -> Result<Vec<u8>>;
}

/// Decodes complete BMP streams (file header included).
pub trait BmpDecoder {
    /// Decodes a BMP stream into RGBA pixels, top row first.
    fn decode_bmp(&self, data: &[u8]) -> Result<IconImage>;

    /// Reads the BMP headers and returns the declared `(width, height)`.
    fn bmp_size(&self, data: &[u8]) -> Result<(u32, u32)>;
}

impl<T: PngDecoder + ?Sized> PngDecoder for &T {
    fn decode_png(&self, data: &[u8]) -> Result<IconImage> {
        (**self).decode_png(data)
    }

    fn png_size(&self, data: &[u8]) -> Result<(u32, u32)> {
        (**self).png_size(data)
    }
}

impl<T: PngEncoder + ?Sized> PngEncoder for &T {
    fn encode_png(&self, image: &IconImage) -> Result<Vec<u8>> {
        (**self).encode_png(image)
    }
}

impl<T: BmpDecoder + ?Sized> BmpDecoder for &T {
    fn decode_bmp(&self, data: &[u8]) -> Result<IconImage> {
        (**self).decode_bmp(data)
    }

    fn bmp_size(&self, data: &[u8]) -> Result<(u32, u32)> {
        (**self).bmp_size(data)
    }
}

//===========================================================================//
