use crate::bmpdepth::row_stride;
use crate::error::{IcoError, Result};
use crate::image::IconImage;
use byteorder::{ByteOrder, LittleEndian};

//===========================================================================//

/// Per-pixel opacity for one decoded bitmap, in row-major order from top to
/// bottom.
pub(crate) struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaMask {
    /// Reads a 1-bit-per-pixel AND mask, where a set bit marks a fully
    /// transparent pixel.  The mask is stored row by row starting from the
    /// *bottom* row, with each row padded to a multiple of four bytes.
    pub(crate) fn from_and_mask(
        mask: &[u8],
        width: u32,
        height: u32,
    ) -> Result<AlphaMask> {
        let row_size = row_stride(width, 1);
        match row_size.checked_mul(height as u64) {
            Some(size) if size <= mask.len() as u64 => {}
            _ => return Err(IcoError::CorruptMaskData),
        }
        let row_size = row_size as usize;
        let width = width as usize;
        let height = height as usize;
        let mut alpha = vec![0u8; width * height];
        for row in 0..height {
            let bits = &mask[(row * row_size)..((row + 1) * row_size)];
            let dest = &mut alpha[((height - row - 1) * width)..][..width];
            for (col, value) in dest.iter_mut().enumerate() {
                if (bits[col / 8] >> (7 - col % 8)) & 0x1 == 0 {
                    *value = u8::MAX;
                }
            }
        }
        Ok(AlphaMask { width: width as u32, height: height as u32, alpha })
    }

    /// Reads the alpha byte of each BGRA pixel of a 32 bpp bitmap, straight
    /// out of the forged BMP stream `bmp` (whose file header gives the pixel
    /// data offset).  Rows are stored starting from the *bottom* row.
    pub(crate) fn from_pixel_alpha(
        bmp: &[u8],
        width: u32,
        height: u32,
    ) -> Result<AlphaMask> {
        if bmp.len() < 14 {
            corrupt_bmp!("data");
        }
        let row_size = row_stride(width, 32);
        let offset = LittleEndian::read_u32(&bmp[10..14]) as u64;
        let end = row_size
            .checked_mul(height as u64)
            .and_then(|size| size.checked_add(offset));
        match end {
            Some(end) if end <= bmp.len() as u64 => {}
            _ => corrupt_bmp!("alpha data"),
        }
        let offset = offset as usize;
        let row_size = row_size as usize;
        let width = width as usize;
        let height = height as usize;
        let mut alpha = vec![0u8; width * height];
        for row in 0..height {
            let start = offset + row * row_size;
            let pixels = &bmp[start..(start + row_size)];
            let dest = &mut alpha[((height - row - 1) * width)..][..width];
            for (value, pixel) in dest.iter_mut().zip(pixels.chunks_exact(4)) {
                *value = pixel[3];
            }
        }
        Ok(AlphaMask { width: width as u32, height: height as u32, alpha })
    }

    /// Copies `color` through this mask.  The mask's alpha replaces the
    /// decoded alpha; fully transparent pixels come out as all zeros.
    pub(crate) fn composite(&self, color: &IconImage) -> Result<IconImage> {
        if color.width() != self.width || color.height() != self.height {
            corrupt_bmp!(
                "mask size ({}x{}, but image is {}x{})",
                self.width,
                self.height,
                color.width(),
                color.height()
            );
        }
        let mut rgba = color.rgba_data().to_vec();
        for (pixel, &alpha) in rgba.chunks_exact_mut(4).zip(self.alpha.iter()) {
            if alpha == 0 {
                pixel.copy_from_slice(&[0, 0, 0, 0]);
            } else {
                pixel[3] = alpha;
            }
        }
        match IconImage::try_from_rgba_data(self.width, self.height, rgba) {
            Some(image) => Ok(image),
            None => corrupt_bmp!("dimensions ({}x{})", self.width, self.height),
        }
    }
}

//===========================================================================//


//===========================================================================//
