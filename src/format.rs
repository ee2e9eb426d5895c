//! Hooks for registering the ICO format with a host's codec registry.

use crate::error::Result;
use crate::image::{IconImage, ImageConfig};
use std::sync::Once;

//===========================================================================//

/// The name the format is registered under.
pub const FORMAT_NAME: &str = "ico";

/// The leading bytes of an ICO file, with `?` matching any byte: reserved
/// field, type 1, any entry count, then the first entry's width, height and
/// palette hint followed by its zero reserved byte.
pub const MAGIC: &[u8] = b"\x00\x00\x01\x00?????\x00";

//===========================================================================//

/// Describes the ICO format to a codec registry.
#[derive(Clone, Copy)]
pub struct FormatDescriptor {
    /// The format name, `"ico"`.
    pub name: &'static str,
    /// The magic pattern; see [`MAGIC`].
    pub magic: &'static [u8],
    /// Decodes the first image of a complete file.
    pub decode: fn(&[u8]) -> Result<IconImage>,
    /// Reads the first image's dimensions from a complete file.
    pub decode_config: fn(&[u8]) -> Result<ImageConfig>,
}

/// A host-side registry of image formats.
pub trait FormatRegistry {
    /// Adds a format to the registry.
    fn register_format(&mut self, format: FormatDescriptor);
}

/// Returns the descriptor for the ICO format.
pub fn descriptor() -> FormatDescriptor {
    FormatDescriptor {
        name: FORMAT_NAME,
        magic: MAGIC,
        decode: decode_slice,
        decode_config: decode_config_slice,
    }
}

/// Returns true if `data` starts with the ICO magic pattern.
pub fn matches_magic(data: &[u8]) -> bool {
    data.len() >= MAGIC.len()
        && MAGIC
            .iter()
            .zip(data.iter())
            .all(|(&pattern, &byte)| pattern == b'?' || pattern == byte)
}

/// Registers the ICO format with `registry`.  Only the first call in the
/// process has any effect; returns true if this call did the registering.
pub fn register<R: FormatRegistry + ?Sized>(registry: &mut R) -> bool {
    static REGISTER: Once = Once::new();
    let mut registered = false;
    REGISTER.call_once(|| {
        log::debug!("ico: registering format {:?}", FORMAT_NAME);
        registry.register_format(descriptor());
        registered = true;
    });
    registered
}

fn decode_slice(data: &[u8]) -> Result<IconImage> {
    crate::decode(data)
}

fn decode_config_slice(data: &[u8]) -> Result<ImageConfig> {
    crate::decode_config(data)
}

//===========================================================================//


//===========================================================================//
