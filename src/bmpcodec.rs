use crate::bmpdepth::{color_table_len, row_stride, BmpDepth};
use crate::codec::BmpDecoder;
use crate::error::{IcoError, Result};
use crate::image::IconImage;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::Read;

//===========================================================================//

// Header sizes, in bytes:
const FILE_HEADER_LEN: usize = 14;
const CORE_HEADER_LEN: u32 = 12;
const INFO_HEADER_LEN: u32 = 40;
const OS2_HEADER_LEN: u32 = 64;

// Compression methods:
const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;
const BI_ALPHABITFIELDS: u32 = 6;

//===========================================================================//

/// The default BMP capability: decodes uncompressed and bit-field BMP
/// streams at 1, 2, 4, 8, 16, 24 and 32 bits per pixel.
#[derive(Clone, Copy, Debug, Default)]
pub struct BmpCodec;

impl BmpDecoder for BmpCodec {
    fn decode_bmp(&self, data: &[u8]) -> Result<IconImage> {
        let header = BmpHeader::read(data)?;
        header.decode_pixels(data)
    }

    fn bmp_size(&self, data: &[u8]) -> Result<(u32, u32)> {
        let header = BmpHeader::read(data)?;
        Ok((header.width, header.height))
    }
}

//===========================================================================//

#[derive(Clone, Copy, Debug)]
struct ChannelMask {
    mask: u32,
    shift: u32,
    max: u32,
}

impl ChannelMask {
    fn new(mask: u32) -> ChannelMask {
        let shift = if mask == 0 { 0 } else { mask.trailing_zeros() };
        ChannelMask { mask, shift, max: mask >> shift }
    }

    fn is_empty(&self) -> bool {
        self.max == 0
    }

    /// Extracts this channel from `pixel` and scales it to 0-255.
    fn extract(&self, pixel: u32) -> u8 {
        if self.max == 0 {
            return 0;
        }
        let value = ((pixel & self.mask) >> self.shift) as u64;
        let max = self.max as u64;
        ((value * 255 + max / 2) / max) as u8
    }
}

#[derive(Clone, Copy, Debug)]
struct ChannelMasks {
    red: ChannelMask,
    green: ChannelMask,
    blue: ChannelMask,
    alpha: ChannelMask,
}

impl ChannelMasks {
    fn new(red: u32, green: u32, blue: u32, alpha: u32) -> ChannelMasks {
        ChannelMasks {
            red: ChannelMask::new(red),
            green: ChannelMask::new(green),
            blue: ChannelMask::new(blue),
            alpha: ChannelMask::new(alpha),
        }
    }

    fn rgba(&self, pixel: u32) -> [u8; 4] {
        let alpha = if self.alpha.is_empty() {
            u8::MAX
        } else {
            self.alpha.extract(pixel)
        };
        [
            self.red.extract(pixel),
            self.green.extract(pixel),
            self.blue.extract(pixel),
            alpha,
        ]
    }
}

//===========================================================================//

struct BmpHeader {
    pixel_offset: u32,
    dib_size: u32,
    width: u32,
    height: u32,
    top_down: bool,
    depth: BmpDepth,
    colors_used: u32,
    masks: Option<ChannelMasks>,
}

impl BmpHeader {
    fn read(data: &[u8]) -> Result<BmpHeader> {
        let mut reader = data;
        let mut magic = [0u8; 2];
        reader.read_exact(&mut magic)?;
        if &magic != b"BM" {
            invalid_bmp!("missing BM signature");
        }
        let _file_size = reader.read_u32::<LittleEndian>()?;
        let _reserved = reader.read_u32::<LittleEndian>()?;
        let pixel_offset = reader.read_u32::<LittleEndian>()?;
        let dib_size = reader.read_u32::<LittleEndian>()?;
        let (width, height, bits_per_pixel, compression, colors_used) =
            if dib_size == CORE_HEADER_LEN {
                let width = reader.read_u16::<LittleEndian>()? as i32;
                let height = reader.read_u16::<LittleEndian>()? as i32;
                let _planes = reader.read_u16::<LittleEndian>()?;
                let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
                (width, height, bits_per_pixel, BI_RGB, 0)
            } else if dib_size >= INFO_HEADER_LEN {
                let width = reader.read_i32::<LittleEndian>()?;
                let height = reader.read_i32::<LittleEndian>()?;
                let _planes = reader.read_u16::<LittleEndian>()?;
                let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
                let compression = reader.read_u32::<LittleEndian>()?;
                let _image_size = reader.read_u32::<LittleEndian>()?;
                let _horz_ppm = reader.read_i32::<LittleEndian>()?;
                let _vert_ppm = reader.read_i32::<LittleEndian>()?;
                let colors_used = reader.read_u32::<LittleEndian>()?;
                let _colors_important = reader.read_u32::<LittleEndian>()?;
                (width, height, bits_per_pixel, compression, colors_used)
            } else {
                unsupported_bmp!("DIB header size ({})", dib_size);
            };
        if width < 1 {
            invalid_bmp!("width (was {}, but must be at least 1)", width);
        }
        if height == 0 || height == i32::MIN {
            invalid_bmp!("height ({})", height);
        }
        let depth = match BmpDepth::from_bits_per_pixel(bits_per_pixel) {
            Some(depth) => depth,
            None => unsupported_bmp!("bits-per-pixel ({})", bits_per_pixel),
        };
        let masks = match compression {
            BI_RGB if depth == BmpDepth::Sixteen => {
                Some(ChannelMasks::new(0x7c00, 0x03e0, 0x001f, 0))
            }
            BI_RGB => None,
            BI_BITFIELDS | BI_ALPHABITFIELDS
                if depth == BmpDepth::Sixteen
                    || depth == BmpDepth::ThirtyTwo =>
            {
                Some(BmpHeader::read_masks(data, dib_size, compression)?)
            }
            _ => unsupported_bmp!(
                "compression method {} at {} bpp",
                compression,
                bits_per_pixel
            ),
        };
        Ok(BmpHeader {
            pixel_offset,
            dib_size,
            width: width as u32,
            height: height.unsigned_abs(),
            top_down: height < 0,
            depth,
            colors_used,
            masks,
        })
    }

    /// Reads the channel masks, which live inside V2+ headers or directly
    /// after a BITMAPINFOHEADER.
    fn read_masks(
        data: &[u8],
        dib_size: u32,
        compression: u32,
    ) -> Result<ChannelMasks> {
        let start = FILE_HEADER_LEN + INFO_HEADER_LEN as usize;
        let has_alpha = if dib_size == INFO_HEADER_LEN {
            compression == BI_ALPHABITFIELDS
        } else {
            dib_size >= 56
        };
        let num_masks = if has_alpha { 4 } else { 3 };
        let masks = match data.get(start..(start + 4 * num_masks)) {
            Some(masks) => masks,
            None => return Err(IcoError::UnexpectedEnd),
        };
        let alpha =
            if has_alpha { LittleEndian::read_u32(&masks[12..16]) } else { 0 };
        Ok(ChannelMasks::new(
            LittleEndian::read_u32(&masks[0..4]),
            LittleEndian::read_u32(&masks[4..8]),
            LittleEndian::read_u32(&masks[8..12]),
            alpha,
        ))
    }

    fn read_color_table(&self, data: &[u8]) -> Result<Vec<[u8; 3]>> {
        let num_colors =
            color_table_len(self.depth.bits_per_pixel(), self.colors_used);
        let entry_len = if self.dib_size == CORE_HEADER_LEN
            || self.dib_size == OS2_HEADER_LEN
        {
            3
        } else {
            4
        };
        let start = FILE_HEADER_LEN + self.dib_size as usize;
        let end = start + num_colors as usize * entry_len;
        let table = match data.get(start..end) {
            Some(table) => table,
            None => return Err(IcoError::UnexpectedEnd),
        };
        Ok(table
            .chunks_exact(entry_len)
            .map(|entry| [entry[2], entry[1], entry[0]])
            .collect())
    }

    fn decode_pixels(&self, data: &[u8]) -> Result<IconImage> {
        let color_table = if self.depth.is_indexed() {
            self.read_color_table(data)?
        } else {
            Vec::new()
        };

        let bits_per_pixel = self.depth.bits_per_pixel();
        let stride = row_stride(self.width, bits_per_pixel);
        let start = self.pixel_offset as u64;
        let end = stride
            .checked_mul(self.height as u64)
            .and_then(|size| size.checked_add(start));
        match end {
            Some(end) if end <= data.len() as u64 => {}
            _ => return Err(IcoError::UnexpectedEnd),
        }
        let stride = stride as usize;
        let width = self.width as usize;
        let height = self.height as usize;

        // Rows are stored starting from the *bottom* row, unless the height
        // was negative.
        let mut rgba = vec![u8::MAX; width * height * 4];
        for row in 0..height {
            let offset = start as usize + row * stride;
            let src = &data[offset..(offset + stride)];
            let y = if self.top_down { row } else { height - row - 1 };
            let dest = &mut rgba[(4 * y * width)..(4 * (y + 1) * width)];
            match self.depth {
                BmpDepth::One
                | BmpDepth::Two
                | BmpDepth::Four
                | BmpDepth::Eight => {
                    let bits = bits_per_pixel as usize;
                    let sample_mask = (1u16 << bits) - 1;
                    for (col, pixel) in dest.chunks_exact_mut(4).enumerate() {
                        let bit = col * bits;
                        let shift = 8 - bits - (bit % 8);
                        let sample = (src[bit / 8] as u16) >> shift;
                        let index = (sample & sample_mask) as usize;
                        let color = match color_table.get(index) {
                            Some(color) => color,
                            None => invalid_bmp!(
                                "color index {} out of range (table has {} \
                                 entries)",
                                index,
                                color_table.len()
                            ),
                        };
                        pixel[..3].copy_from_slice(color);
                    }
                }
                BmpDepth::Sixteen => {
                    let masks = self.channel_masks()?;
                    for (pixel, color) in
                        dest.chunks_exact_mut(4).zip(src.chunks_exact(2))
                    {
                        let value = LittleEndian::read_u16(color) as u32;
                        pixel.copy_from_slice(&masks.rgba(value));
                    }
                }
                BmpDepth::TwentyFour => {
                    for (pixel, color) in
                        dest.chunks_exact_mut(4).zip(src.chunks_exact(3))
                    {
                        pixel[0] = color[2];
                        pixel[1] = color[1];
                        pixel[2] = color[0];
                    }
                }
                BmpDepth::ThirtyTwo => {
                    for (pixel, color) in
                        dest.chunks_exact_mut(4).zip(src.chunks_exact(4))
                    {
                        match self.masks {
                            Some(ref masks) => {
                                let value = LittleEndian::read_u32(color);
                                pixel.copy_from_slice(&masks.rgba(value));
                            }
                            // Without bit fields, the fourth byte is
                            // reserved rather than alpha.
                            None => {
                                pixel[0] = color[2];
                                pixel[1] = color[1];
                                pixel[2] = color[0];
                            }
                        }
                    }
                }
            }
        }

        match IconImage::try_from_rgba_data(self.width, self.height, rgba) {
            Some(image) => Ok(image),
            None => invalid_bmp!("{}x{} image", self.width, self.height),
        }
    }

    fn channel_masks(&self) -> Result<ChannelMasks> {
        match self.masks {
            Some(masks) => Ok(masks),
            None => invalid_bmp!("missing channel masks"),
        }
    }
}

//===========================================================================//


//===========================================================================//
