use crate::bmpcodec::BmpCodec;
use crate::codec::{BmpDecoder, PngDecoder};
use crate::error::{IcoError, Result};
use crate::forge::ForgedBitmap;
use crate::icondir::{is_png, DirectoryEntry, IconDir};
use crate::image::{IconImage, ImageConfig};
use crate::ingest::{read_bounded, MAX_ICO_SIZE};
use crate::mask::AlphaMask;
use crate::pngcodec::PngCodec;
use std::io::Read;

//===========================================================================//

/// Decodes ICO files, delegating embedded PNG and BMP data to pluggable
/// codecs.
///
/// The decoder holds no state between calls, so a single instance can be
/// shared freely.
#[derive(Clone, Debug)]
pub struct IcoDecoder<P = PngCodec, B = BmpCodec> {
    png: P,
    bmp: B,
    max_input_size: u64,
}

impl IcoDecoder {
    /// Creates a decoder with the default codecs and a 64 MiB input cap.
    pub fn new() -> IcoDecoder {
        IcoDecoder::with_codecs(PngCodec, BmpCodec)
    }
}

impl Default for IcoDecoder {
    fn default() -> IcoDecoder {
        IcoDecoder::new()
    }
}

impl<P: PngDecoder, B: BmpDecoder> IcoDecoder<P, B> {
    /// Creates a decoder that uses the given PNG and BMP codecs.
    pub fn with_codecs(png: P, bmp: B) -> IcoDecoder<P, B> {
        IcoDecoder { png, bmp, max_input_size: MAX_ICO_SIZE }
    }

    /// Sets the maximum number of bytes read from the input.  Larger inputs
    /// fail with [`IcoError::InputTooLarge`].
    pub fn max_input_size(mut self, limit: u64) -> IcoDecoder<P, B> {
        self.max_input_size = limit;
        self
    }

    /// Decodes the first image in an ICO file.
    pub fn decode<R: Read>(&self, reader: R) -> Result<IconImage> {
        match self.decode_all(reader)?.into_iter().next() {
            Some(image) => Ok(image),
            None => Err(IcoError::NoImages),
        }
    }

    /// Decodes every image in an ICO file, in directory order.  Any
    /// malformed entry fails the whole call.
    pub fn decode_all<R: Read>(&self, reader: R) -> Result<Vec<IconImage>> {
        let file = read_bounded(reader, self.max_input_size)?;
        let icondir = IconDir::read(&file)?;
        log::debug!(
            "ico: decoding {} entries from {} bytes",
            icondir.entries().len(),
            file.len()
        );
        let mut images = Vec::with_capacity(icondir.entries().len());
        for (index, entry) in icondir.entries().iter().enumerate() {
            let payload = entry.payload(&file)?;
            let image = if is_png(payload) {
                log::trace!("ico: entry {} is PNG", index);
                self.png.decode_png(payload)?
            } else {
                log::trace!("ico: entry {} is BMP", index);
                self.decode_bmp_entry(entry, payload)?
            };
            images.push(image);
        }
        Ok(images)
    }

    /// Returns the dimensions of the first image in an ICO file, reading
    /// only its headers.
    pub fn decode_config<R: Read>(&self, reader: R) -> Result<ImageConfig> {
        let file = read_bounded(reader, self.max_input_size)?;
        let icondir = IconDir::read(&file)?;
        let entry = match icondir.entries().first() {
            Some(entry) => entry,
            None => return Err(IcoError::NoImages),
        };
        let payload = entry.payload(&file)?;
        let (width, height) = if is_png(payload) {
            self.png.png_size(payload)?
        } else {
            let forged = ForgedBitmap::forge(payload, entry.height())?;
            self.bmp.bmp_size(forged.bmp_data())?
        };
        Ok(ImageConfig { width, height })
    }

    fn decode_bmp_entry(
        &self,
        entry: &DirectoryEntry,
        payload: &[u8],
    ) -> Result<IconImage> {
        let forged = ForgedBitmap::forge(payload, entry.height())?;
        let color = self.bmp.decode_bmp(forged.bmp_data())?;
        let mask = match forged.mask_data() {
            Some(mask) => {
                AlphaMask::from_and_mask(mask, color.width(), color.height())?
            }
            None => AlphaMask::from_pixel_alpha(
                forged.bmp_data(),
                color.width(),
                color.height(),
            )?,
        };
        mask.composite(&color)
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::IcoDecoder;
    use crate::codec::{BmpDecoder, PngDecoder};
    use crate::error::{IcoError, Result};
    use crate::icondir::PNG_SIGNATURE;
    use crate::image::IconImage;
    use std::cell::Cell;

    // Stands in for a PNG codec: every stream is a 1x1 image whose red
    // channel is the stream's length.
    #[derive(Default)]
    struct FakePng {
        calls: Cell<usize>,
    }

    impl PngDecoder for FakePng {
        fn decode_png(&self, data: &[u8]) -> Result<IconImage> {
            self.calls.set(self.calls.get() + 1);
            Ok(IconImage::from_rgba_data(1, 1, vec![data.len() as u8, 0, 0, 255]))
        }

        fn png_size(&self, data: &[u8]) -> Result<(u32, u32)> {
            Ok((data.len() as u32, 1))
        }
    }

    // A BMP codec that must never be reached.
    struct NoBmp;

    impl BmpDecoder for NoBmp {
        fn decode_bmp(&self, _data: &[u8]) -> Result<IconImage> {
            panic!("BMP codec called for PNG entry");
        }

        fn bmp_size(&self, _data: &[u8]) -> Result<(u32, u32)> {
            panic!("BMP codec called for PNG entry");
        }
    }

    // A BMP codec that returns an opaque gray image of the declared size.
    struct GrayBmp;

    impl BmpDecoder for GrayBmp {
        fn decode_bmp(&self, data: &[u8]) -> Result<IconImage> {
            let (width, height) = self.bmp_size(data)?;
            let rgba = vec![0x80; (width * height * 4) as usize];
            Ok(IconImage::from_rgba_data(width, height, rgba))
        }

        fn bmp_size(&self, data: &[u8]) -> Result<(u32, u32)> {
            let width = u32::from_le_bytes([data[18], data[19], data[20], data[21]]);
            let height = u32::from_le_bytes([data[22], data[23], data[24], data[25]]);
            Ok((width, height))
        }
    }

    fn png_entry_file(payload_lens: &[usize]) -> Vec<u8> {
        let count = payload_lens.len();
        let mut file = vec![0, 0, 1, 0, count as u8, 0];
        let mut offset = 6 + 16 * count;
        for &len in payload_lens {
            file.extend_from_slice(&[1, 1, 0, 0, 1, 0, 32, 0]);
            file.extend_from_slice(&(len as u32).to_le_bytes());
            file.extend_from_slice(&(offset as u32).to_le_bytes());
            offset += len;
        }
        for &len in payload_lens {
            let mut payload = PNG_SIGNATURE.to_vec();
            payload.resize(len, 0);
            file.extend_from_slice(&payload);
        }
        file
    }

    #[test]
    fn dispatch_png_entries_in_order() {
        let file = png_entry_file(&[10, 12, 9]);
        let png = FakePng::default();
        let decoder = IcoDecoder::with_codecs(&png, NoBmp);
        let images = decoder.decode_all(file.as_slice()).unwrap();
        assert_eq!(png.calls.get(), 3);
        let reds: Vec<u8> =
            images.iter().map(|image| image.rgba_data()[0]).collect();
        assert_eq!(reds, vec![10, 12, 9]);
    }

    #[test]
    fn decode_returns_first_image() {
        let file = png_entry_file(&[11, 14]);
        let decoder = IcoDecoder::with_codecs(FakePng::default(), NoBmp);
        let image = decoder.decode(file.as_slice()).unwrap();
        assert_eq!(image.rgba_data()[0], 11);
    }

    #[test]
    fn decode_config_uses_png_header_query() {
        let file = png_entry_file(&[13, 20]);
        let png = FakePng::default();
        let decoder = IcoDecoder::with_codecs(&png, NoBmp);
        let config = decoder.decode_config(file.as_slice()).unwrap();
        assert_eq!((config.width, config.height), (13, 1));
        assert_eq!(png.calls.get(), 0);
    }

    #[test]
    fn bmp_entry_is_forged_and_masked() {
        // A 2x2 entry at 24 bpp with the top-right pixel masked out.
        let mut file = vec![0, 0, 1, 0, 1, 0];
        let payload_len = 40 + 16 + 8;
        file.extend_from_slice(&[2, 2, 0, 0, 1, 0, 24, 0]);
        file.extend_from_slice(&(payload_len as u32).to_le_bytes());
        file.extend_from_slice(&22u32.to_le_bytes());
        let mut header = [0u8; 40];
        header[0] = 40;
        header[4] = 2;
        header[8] = 4;
        header[12] = 1;
        header[14] = 24;
        file.extend_from_slice(&header);
        file.extend_from_slice(&[0u8; 16]);
        file.extend_from_slice(b"\x00\x00\x00\x00\x40\x00\x00\x00");
        let decoder = IcoDecoder::with_codecs(FakePng::default(), GrayBmp);
        let image = decoder.decode(file.as_slice()).unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
        let rgba: &[u8] = b"\
            \x80\x80\x80\xff\x00\x00\x00\x00\
            \x80\x80\x80\xff\x80\x80\x80\xff";
        assert_eq!(image.rgba_data(), rgba);
        let config = decoder.decode_config(file.as_slice()).unwrap();
        assert_eq!((config.width, config.height), (2, 2));
    }

    #[test]
    fn bad_entry_fails_whole_file() {
        let mut file = png_entry_file(&[10, 10]);
        // Zero out the second entry's size.
        file[6 + 16 + 8..6 + 16 + 12].copy_from_slice(&[0, 0, 0, 0]);
        let decoder = IcoDecoder::with_codecs(FakePng::default(), NoBmp);
        assert!(matches!(
            decoder.decode_all(file.as_slice()),
            Err(IcoError::CorruptEntry(_))
        ));
    }

    #[test]
    fn input_cap_is_configurable() {
        let file = png_entry_file(&[10]);
        let decoder = IcoDecoder::with_codecs(FakePng::default(), NoBmp)
            .max_input_size(file.len() as u64 - 1);
        assert!(matches!(
            decoder.decode(file.as_slice()),
            Err(IcoError::InputTooLarge { .. })
        ));
    }
}

//===========================================================================//
