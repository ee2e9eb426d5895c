//! A library for decoding and encoding Windows ICO files.
//!
//! Each image in an ICO file is stored either as a complete PNG stream or as
//! a Windows bitmap (DIB) without its BMP file header.  Decoding forges the
//! missing header, hands the result to a BMP decoder, and then applies the
//! entry's AND mask (or, at 32 bpp, its alpha channel) to produce
//! straight-alpha RGBA pixels.  Encoding always produces a single PNG-backed
//! entry.
//!
//! ```no_run
//! let file = std::fs::File::open("favicon.ico").unwrap();
//! let image = icodec::decode(file).unwrap();
//! println!("{}x{}", image.width(), image.height());
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bmpcodec;
mod bmpdepth;
pub mod codec;
mod decoder;
mod encoder;
mod error;
mod forge;
pub mod format;
mod icondir;
mod image;
mod ingest;
mod mask;
mod pngcodec;

use std::io::{Read, Write};

pub use crate::bmpcodec::BmpCodec;
pub use crate::decoder::IcoDecoder;
pub use crate::encoder::IcoEncoder;
pub use crate::error::{IcoError, Result};
pub use crate::forge::ForgedBitmap;
pub use crate::icondir::{
    is_png, DirectoryEntry, FileHeader, IconDir, PNG_SIGNATURE,
};
pub use crate::image::{IconImage, ImageConfig};
pub use crate::ingest::MAX_ICO_SIZE;
pub use crate::pngcodec::PngCodec;

//===========================================================================//

/// Decodes the first image in an ICO file.
pub fn decode<R: Read>(reader: R) -> Result<IconImage> {
    IcoDecoder::new().decode(reader)
}

/// Decodes every image in an ICO file, in directory order.
pub fn decode_all<R: Read>(reader: R) -> Result<Vec<IconImage>> {
    IcoDecoder::new().decode_all(reader)
}

/// Returns the dimensions of the first image in an ICO file without
/// decoding its pixels.
pub fn decode_config<R: Read>(reader: R) -> Result<ImageConfig> {
    IcoDecoder::new().decode_config(reader)
}

/// Encodes `image` as a single-entry, PNG-backed ICO file.  Fails with
/// [`IcoError::ImageTooLarge`] if either dimension exceeds 256.
pub fn encode<W: Write>(writer: W, image: &IconImage) -> Result<()> {
    IcoEncoder::new().write(writer, image)
}

//===========================================================================//
