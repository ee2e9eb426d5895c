use crate::error::{IcoError, Result};
use std::io::Read;

//===========================================================================//

/// The default cap on the size of an ICO file, in bytes (64 MiB).
pub const MAX_ICO_SIZE: u64 = 64 << 20;

//===========================================================================//

/// Reads all of `reader` into memory, failing with
/// [`IcoError::InputTooLarge`] as soon as more than `limit` bytes are
/// available.  At most `limit + 1` bytes are ever buffered.
pub(crate) fn read_bounded<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>> {
    let mut file = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut file)?;
    if file.len() as u64 > limit {
        return Err(IcoError::InputTooLarge { limit });
    }
    Ok(file)
}

//===========================================================================//


//===========================================================================//
