use crate::codec::PngEncoder;
use crate::error::{IcoError, Result};
use crate::icondir::{DirectoryEntry, FileHeader, DIR_ENTRY_LEN, FILE_HEADER_LEN};
use crate::image::IconImage;
use crate::pngcodec::PngCodec;
use std::io::Write;

//===========================================================================//

// The largest width or height an ICO directory entry can describe.
const MAX_DIMENSION: u32 = 256;

//===========================================================================//

/// Encodes single images as PNG-backed ICO files.
#[derive(Clone, Debug, Default)]
pub struct IcoEncoder<P = PngCodec> {
    png: P,
}

impl IcoEncoder {
    /// Creates an encoder with the default PNG codec.
    pub fn new() -> IcoEncoder {
        IcoEncoder { png: PngCodec }
    }
}

impl<P: PngEncoder> IcoEncoder<P> {
    /// Creates an encoder that uses the given PNG codec.
    pub fn with_codec(png: P) -> IcoEncoder<P> {
        IcoEncoder { png }
    }

    /// Encodes `image` as a one-entry ICO file and returns its bytes.
    pub fn encode(&self, image: &IconImage) -> Result<Vec<u8>> {
        if image.width() > MAX_DIMENSION || image.height() > MAX_DIMENSION {
            return Err(IcoError::ImageTooLarge {
                width: image.width(),
                height: image.height(),
            });
        }
        let png_data = self.png.encode_png(image)?;
        let data_size = match u32::try_from(png_data.len()) {
            Ok(size) => size,
            Err(_) => {
                return Err(IcoError::ImageTooLarge {
                    width: image.width(),
                    height: image.height(),
                })
            }
        };
        log::debug!(
            "ico: encoding {}x{} image as {} bytes of PNG",
            image.width(),
            image.height(),
            data_size
        );
        // Width and height are stored in one byte each; 256 truncates to
        // the 0 that readers take to mean 256.
        let entry = DirectoryEntry::new(
            image.width(),
            image.height(),
            32,
            data_size,
            FILE_HEADER_LEN + DIR_ENTRY_LEN,
        );
        let mut data = Vec::<u8>::with_capacity(
            (FILE_HEADER_LEN + DIR_ENTRY_LEN) as usize + png_data.len(),
        );
        FileHeader::new(1).write(&mut data)?;
        entry.write(&mut data)?;
        data.extend_from_slice(&png_data);
        Ok(data)
    }

    /// Encodes `image` as a one-entry ICO file and writes it to `writer`.
    pub fn write<W: Write>(&self, mut writer: W, image: &IconImage) -> Result<()> {
        let data = self.encode(image)?;
        writer.write_all(&data)?;
        Ok(())
    }
}

//===========================================================================//


//===========================================================================//
