use std::io;

//===========================================================================//

/// Errors from decoding and encoding ICO files.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IcoError {
    /// The input is larger than the ingestion cap.
    #[error("ico: file too large (limit is {limit} bytes)")]
    InputTooLarge {
        /// The cap that was exceeded, in bytes.
        limit: u64,
    },

    /// The file header has a nonzero reserved field or a type other than 1.
    #[error("ico: corrupted head: [{reserved:x},{restype:x}]")]
    CorruptHeader {
        /// The value of the reserved field.
        reserved: u16,
        /// The value of the resource type field.
        restype: u16,
    },

    /// The file contains no images.
    #[error("ico: no images")]
    NoImages,

    /// A directory entry describes an unusable payload span.
    #[error("ico: corrupted entry ({0})")]
    CorruptEntry(String),

    /// The input ended in the middle of a structure.
    #[error("ico: unexpected end of input")]
    UnexpectedEnd,

    /// The embedded DIB header declares an impossible size.
    #[error("ico: corrupted DIB header size ({0})")]
    CorruptDibHeader(u32),

    /// The bitmap's dimensions, mask size or data offset are inconsistent.
    #[error("ico: corrupted bmp {0}")]
    CorruptBitmapGeometry(String),

    /// The AND mask is shorter than its dimensions require.
    #[error("ico: corrupted mask data")]
    CorruptMaskData,

    /// The image to encode is wider or taller than 256 pixels.
    #[error(
        "ico: image dimensions must not exceed 256x256 pixels \
         (was {width}x{height})"
    )]
    ImageTooLarge {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },

    /// The PNG decoder rejected an embedded PNG stream.
    #[error("ico: malformed PNG data: {0}")]
    PngDecoding(#[from] png::DecodingError),

    /// The PNG stream decoded to a layout that can't be turned into RGBA.
    #[error("ico: unsupported PNG data: {0}")]
    UnsupportedPng(String),

    /// The PNG encoder failed.
    #[error("ico: PNG encoding failed: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// The BMP decoder rejected a forged bitmap.
    #[error("ico: invalid bitmap: {0}")]
    InvalidBitmap(String),

    /// The bitmap uses a feature the BMP decoder does not implement.
    #[error("ico: unsupported bitmap: {0}")]
    UnsupportedBitmap(String),

    /// Reading from or writing to the underlying stream failed.
    #[error("ico: {0}")]
    Io(io::Error),
}

impl From<io::Error> for IcoError {
    fn from(error: io::Error) -> IcoError {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            IcoError::UnexpectedEnd
        } else {
            IcoError::Io(error)
        }
    }
}

/// A `Result` whose error type is [`IcoError`].
pub type Result<T> = std::result::Result<T, IcoError>;

//===========================================================================//


//===========================================================================//
