use crate::codec::{PngDecoder, PngEncoder};
use crate::error::{IcoError, Result};
use crate::image::IconImage;

//===========================================================================//

/// The default PNG capability, backed by the `png` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCodec;

impl PngCodec {
    fn read_info(data: &[u8]) -> Result<png::Reader<&[u8]>> {
        let mut decoder = png::Decoder::new(data);
        // Expand palettes, tRNS chunks and sub-byte samples, and drop the
        // low byte of 16-bit samples, so every frame comes out at 8 bits.
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );
        Ok(decoder.read_info()?)
    }
}

impl PngDecoder for PngCodec {
    fn decode_png(&self, data: &[u8]) -> Result<IconImage> {
        let mut png_reader = PngCodec::read_info(data)?;
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let frame = png_reader.next_frame(&mut buffer)?;
        buffer.truncate(frame.buffer_size());
        if frame.bit_depth != png::BitDepth::Eight {
            return Err(IcoError::UnsupportedPng(format!(
                "bit depth {:?}",
                frame.bit_depth
            )));
        }
        let rgba_data = match frame.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity((buffer.len() / 3) * 4);
                for pixel in buffer.chunks_exact(3) {
                    rgba.extend_from_slice(pixel);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            png::ColorType::GrayscaleAlpha => {
                let mut rgba = Vec::with_capacity(buffer.len() * 2);
                for pixel in buffer.chunks_exact(2) {
                    let (gray, alpha) = (pixel[0], pixel[1]);
                    rgba.extend_from_slice(&[gray, gray, gray, alpha]);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buffer.len() * 4);
                for gray in buffer.into_iter() {
                    rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
                }
                rgba
            }
            png::ColorType::Indexed => {
                return Err(IcoError::UnsupportedPng(format!(
                    "color type {:?}",
                    frame.color_type
                )));
            }
        };
        match IconImage::try_from_rgba_data(frame.width, frame.height, rgba_data)
        {
            Some(image) => Ok(image),
            None => Err(IcoError::UnsupportedPng(format!(
                "frame of {}x{} pixels",
                frame.width, frame.height
            ))),
        }
    }

    fn png_size(&self, data: &[u8]) -> Result<(u32, u32)> {
        let png_reader = PngCodec::read_info(data)?;
        let info = png_reader.info();
        Ok((info.width, info.height))
    }
}

impl PngEncoder for PngCodec {
    fn encode_png(&self, image: &IconImage) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        {
            let mut encoder =
                png::Encoder::new(&mut data, image.width(), image.height());
            encoder.set_depth(png::BitDepth::Eight);
            let has_alpha = image.has_alpha();
            if has_alpha {
                encoder.set_color(png::ColorType::Rgba);
            } else {
                encoder.set_color(png::ColorType::Rgb);
            }
            let mut writer = encoder.write_header()?;
            if has_alpha {
                writer.write_image_data(image.rgba_data())?;
            } else {
                let rgba = image.rgba_data();
                let mut rgb_data = Vec::<u8>::with_capacity((rgba.len() / 4) * 3);
                for pixel in rgba.chunks_exact(4) {
                    rgb_data.extend_from_slice(&pixel[..3]);
                }
                writer.write_image_data(&rgb_data)?;
            }
            writer.finish()?;
        }
        Ok(data)
    }
}

//===========================================================================//


//===========================================================================//
