#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use icodec::codec::PngEncoder;
use icodec::{IconImage, PngCodec};

//===========================================================================//

/// A gradient image with every pixel opaque.
pub fn gradient_image(width: u32, height: u32) -> IconImage {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            rgba.push((x * 255 / width) as u8);
            rgba.push((y * 255 / height) as u8);
            rgba.push(0x32);
            rgba.push(0xff);
        }
    }
    IconImage::from_rgba_data(width, height, rgba)
}

/// An image using at most `num_colors` distinct opaque colors, with some
/// fully transparent pixels (stored as all zeros, as the decoder emits
/// them).
pub fn palette_image(width: u32, height: u32, num_colors: u32) -> IconImage {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            if (x + 2 * y) % 7 == 0 {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                let index = (3 * x + 5 * y) % num_colors;
                rgba.extend_from_slice(&[
                    index as u8,
                    (255 - index) as u8,
                    0x40,
                    0xff,
                ]);
            }
        }
    }
    IconImage::from_rgba_data(width, height, rgba)
}

/// An image with varying, partial alpha.  Fully transparent pixels are all
/// zeros.
pub fn translucent_image(width: u32, height: u32) -> IconImage {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let alpha = ((x + y) * 17 % 256) as u8;
            if alpha == 0 {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                rgba.extend_from_slice(&[x as u8, y as u8, 0x99, alpha]);
            }
        }
    }
    IconImage::from_rgba_data(width, height, rgba)
}

//===========================================================================//

pub fn png_payload(image: &IconImage) -> Vec<u8> {
    PngCodec.encode_png(image).unwrap()
}

/// Encodes `image` as a headerless ICO bitmap at `bits` per pixel: a
/// BITMAPINFOHEADER with doubled height, a full color table for indexed
/// depths, bottom-up color rows, then the AND mask.
pub fn bmp_payload(image: &IconImage, bits: u16) -> Vec<u8> {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let rgba = image.rgba_data();

    // Build the color table from the opaque pixels.
    let mut colors: Vec<[u8; 3]> = Vec::new();
    let indexed = bits <= 8;
    if indexed {
        for chunk in rgba.chunks_exact(4) {
            let color = [chunk[0], chunk[1], chunk[2]];
            if chunk[3] != 0 && !colors.contains(&color) {
                colors.push(color);
            }
        }
        assert!(colors.len() <= 1 << bits, "too many colors for {} bpp", bits);
    }

    let mut data = Vec::<u8>::new();
    data.write_u32::<LittleEndian>(40).unwrap();
    data.write_i32::<LittleEndian>(width as i32).unwrap();
    data.write_i32::<LittleEndian>(2 * height as i32).unwrap();
    data.write_u16::<LittleEndian>(1).unwrap();
    data.write_u16::<LittleEndian>(bits).unwrap();
    for _ in 0..6 {
        data.write_u32::<LittleEndian>(0).unwrap();
    }
    if indexed {
        for index in 0..(1usize << bits) {
            let [red, green, blue] = colors.get(index).copied().unwrap_or([0; 3]);
            data.extend_from_slice(&[blue, green, red, 0]);
        }
    }

    let row_size = (width * bits as usize).div_ceil(32) * 4;
    for y in (0..height).rev() {
        let mut row = vec![0u8; row_size];
        for x in 0..width {
            let [red, green, blue, alpha] = pixel_at(rgba, width, x, y);
            match bits {
                1 | 2 | 4 | 8 => {
                    let index = colors
                        .iter()
                        .position(|&color| color == [red, green, blue])
                        .unwrap_or(0) as u8;
                    let index = if alpha == 0 { 0 } else { index };
                    let bit = x * bits as usize;
                    row[bit / 8] |= index << (8 - bits as usize - bit % 8);
                }
                24 => row[3 * x..][..3].copy_from_slice(&[blue, green, red]),
                32 => row[4 * x..][..4]
                    .copy_from_slice(&[blue, green, red, alpha]),
                _ => panic!("unsupported depth {}", bits),
            }
        }
        data.extend_from_slice(&row);
    }

    let mask_row_size = width.div_ceil(32) * 4;
    for y in (0..height).rev() {
        let mut row = vec![0u8; mask_row_size];
        for x in 0..width {
            if pixel_at(rgba, width, x, y)[3] == 0 {
                row[x / 8] |= 0x80 >> (x % 8);
            }
        }
        data.extend_from_slice(&row);
    }
    data
}

fn pixel_at(rgba: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
    let start = 4 * (y * width + x);
    [rgba[start], rgba[start + 1], rgba[start + 2], rgba[start + 3]]
}

//===========================================================================//

/// One directory entry of a test ICO file.
pub struct Entry {
    pub width: u32,
    pub height: u32,
    pub bits: u16,
    pub payload: Vec<u8>,
}

impl Entry {
    pub fn png(image: &IconImage) -> Entry {
        Entry {
            width: image.width(),
            height: image.height(),
            bits: 32,
            payload: png_payload(image),
        }
    }

    pub fn bmp(image: &IconImage, bits: u16) -> Entry {
        Entry {
            width: image.width(),
            height: image.height(),
            bits,
            payload: bmp_payload(image, bits),
        }
    }
}

/// Assembles an ICO file from the given entries, payloads in order.
pub fn build_ico(entries: &[Entry]) -> Vec<u8> {
    let mut file = Vec::<u8>::new();
    file.write_u16::<LittleEndian>(0).unwrap();
    file.write_u16::<LittleEndian>(1).unwrap();
    file.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
    let mut offset = 6 + 16 * entries.len() as u32;
    for entry in entries {
        file.write_u8(entry.width as u8).unwrap();
        file.write_u8(entry.height as u8).unwrap();
        file.write_u8(0).unwrap();
        file.write_u8(0).unwrap();
        file.write_u16::<LittleEndian>(1).unwrap();
        file.write_u16::<LittleEndian>(entry.bits).unwrap();
        file.write_u32::<LittleEndian>(entry.payload.len() as u32).unwrap();
        file.write_u32::<LittleEndian>(offset).unwrap();
        offset += entry.payload.len() as u32;
    }
    for entry in entries {
        file.extend_from_slice(&entry.payload);
    }
    file
}

//===========================================================================//
