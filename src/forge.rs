use crate::bmpdepth::{color_table_len, row_stride};
use crate::error::{IcoError, Result};
use byteorder::{ByteOrder, LittleEndian};

//===========================================================================//

// The size of a BITMAPFILEHEADER struct, in bytes.
pub(crate) const BMP_FILE_HEADER_LEN: usize = 14;

// DIB header sizes with special handling:
const CORE_HEADER_LEN: u32 = 12; // BITMAPCOREHEADER
const INFO_HEADER_LEN: u32 = 40; // BITMAPINFOHEADER
const OS2_HEADER_LEN: u32 = 64; // OS22XBITMAPHEADER

// Compression methods whose channel masks follow a BITMAPINFOHEADER.
const BI_BITFIELDS: u32 = 3;
const BI_ALPHABITFIELDS: u32 = 6;

//===========================================================================//

/// A complete BMP stream forged from the headerless DIB stored in an ICO
/// entry, together with the location of the entry's AND mask.
#[derive(Clone, Debug)]
pub struct ForgedBitmap {
    data: Vec<u8>,
    bmp_len: usize,
    mask_start: Option<usize>,
    width: u32,
    height: u32,
    bits_per_pixel: u16,
    pixel_offset: u32,
}

impl ForgedBitmap {
    /// Forges a BMP file header in front of a copy of `payload`.
    /// `entry_height` is the height declared by the directory entry, which
    /// helps decide whether the DIB's height counts the AND mask rows.
    pub fn forge(payload: &[u8], entry_height: u32) -> Result<ForgedBitmap> {
        if payload.len() < 4 {
            return Err(IcoError::UnexpectedEnd);
        }
        let dib_size = LittleEndian::read_u32(&payload[0..4]);
        if dib_size < CORE_HEADER_LEN || dib_size as usize > payload.len() {
            return Err(IcoError::CorruptDibHeader(dib_size));
        }
        let header_len = dib_size as usize;
        let mut data = vec![0u8; BMP_FILE_HEADER_LEN + payload.len()];
        data[BMP_FILE_HEADER_LEN..].copy_from_slice(payload);

        // Pull the fields we need out of the DIB header.  The rest is left
        // for the BMP decoder.
        let dib = &payload[..];
        let (width, mut height, bits_per_pixel, colors_used, compression) =
            if dib_size == CORE_HEADER_LEN {
                (
                    LittleEndian::read_u16(&dib[4..6]) as u32,
                    LittleEndian::read_u16(&dib[6..8]) as u32,
                    LittleEndian::read_u16(&dib[10..12]),
                    0,
                    0,
                )
            } else {
                if dib.len() < 16 {
                    return Err(IcoError::UnexpectedEnd);
                }
                let colors_used = if header_len >= 36 {
                    LittleEndian::read_u32(&dib[32..36])
                } else {
                    0
                };
                let compression = if header_len >= 20 {
                    LittleEndian::read_u32(&dib[16..20])
                } else {
                    0
                };
                (
                    LittleEndian::read_u32(&dib[4..8]),
                    LittleEndian::read_u32(&dib[8..12]),
                    LittleEndian::read_u16(&dib[14..16]),
                    colors_used,
                    compression,
                )
            };

        // ICO bitmaps usually store the combined height of the color plane
        // and the AND mask.  Halve it when the directory, the width, or the
        // aspect ratio says so, and patch the header to match.
        if height % 2 == 0 {
            let half = height / 2;
            if half == entry_height || half == width || height > width {
                log::trace!(
                    "ico: halving DIB height {} to {} (entry height {})",
                    height,
                    half,
                    entry_height
                );
                height = half;
                let dib = &mut data[BMP_FILE_HEADER_LEN..];
                if dib_size == CORE_HEADER_LEN {
                    let height = match u16::try_from(height) {
                        Ok(height) => height,
                        Err(_) => corrupt_bmp!("height ({})", height),
                    };
                    LittleEndian::write_u16(&mut dib[6..8], height);
                } else {
                    LittleEndian::write_u32(&mut dib[8..12], height);
                }
            }
        }

        // Everything past the color data is the AND mask, except at 32 bpp
        // where the alpha channel replaces it.
        let mut image_size = payload.len() as u64;
        let mut mask_start = None;
        if bits_per_pixel != 32 {
            if width == 0 || height == 0 {
                corrupt_bmp!("dimensions ({}x{})", width, height);
            }
            let mask_size = row_stride(width, 1) * height as u64;
            if mask_size > image_size {
                corrupt_bmp!("mask size ({})", mask_size);
            }
            image_size -= mask_size;
            if image_size == 0 {
                corrupt_bmp!("image size");
            }
            mask_start = Some(BMP_FILE_HEADER_LEN + image_size as usize);
        }
        let bmp_len = BMP_FILE_HEADER_LEN + image_size as usize;
        let file_size = match u32::try_from(bmp_len) {
            Ok(size) => size,
            Err(_) => corrupt_bmp!("file size ({})", bmp_len),
        };

        // The pixel data starts after the DIB header, the color table, any
        // channel masks, and any extra data the header declares.
        let entry_len: u64 =
            if dib_size == CORE_HEADER_LEN || dib_size == OS2_HEADER_LEN {
                3
            } else {
                4
            };
        let table_size =
            color_table_len(bits_per_pixel, colors_used) as u64 * entry_len;
        let masks_size: u64 = match (dib_size, compression) {
            (INFO_HEADER_LEN, BI_BITFIELDS) => 12,
            (INFO_HEADER_LEN, BI_ALPHABITFIELDS) => 16,
            _ => 0,
        };
        let mut offset = BMP_FILE_HEADER_LEN as u64
            + dib_size as u64
            + table_size
            + masks_size;
        if dib_size > INFO_HEADER_LEN {
            offset += LittleEndian::read_u32(&dib[header_len - 8..header_len - 4])
                as u64;
        }
        if offset >= bmp_len as u64 {
            corrupt_bmp!("data offset ({})", offset);
        }

        data[0..2].copy_from_slice(b"BM");
        LittleEndian::write_u32(&mut data[2..6], file_size);
        LittleEndian::write_u32(&mut data[10..14], offset as u32);
        Ok(ForgedBitmap {
            data,
            bmp_len,
            mask_start,
            width,
            height,
            bits_per_pixel,
            pixel_offset: offset as u32,
        })
    }

    /// Returns the forged BMP stream, file header included and AND mask
    /// excluded.
    pub fn bmp_data(&self) -> &[u8] {
        &self.data[..self.bmp_len]
    }

    /// Returns the trailing AND mask, or `None` for 32 bpp bitmaps.
    pub fn mask_data(&self) -> Option<&[u8]> {
        self.mask_start.map(|start| &self.data[start..])
    }

    /// Returns the width declared by the DIB header.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the color plane, after any halving.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the bits-per-pixel declared by the DIB header.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the offset of the pixel data within [`Self::bmp_data`].
    pub fn pixel_offset(&self) -> u32 {
        self.pixel_offset
    }
}

//===========================================================================//


//===========================================================================//
