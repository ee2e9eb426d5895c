use crate::error::{IcoError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{self, Cursor, Read, Write};

//===========================================================================//

/// The signature that all PNG files start with.
pub const PNG_SIGNATURE: [u8; 8] =
    [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

// The sizes of the ICONDIR and ICONDIRENTRY structs, in bytes.
pub(crate) const FILE_HEADER_LEN: u32 = 6;
pub(crate) const DIR_ENTRY_LEN: u32 = 16;

// The resource type number of plain icons (cursors use 2).
pub(crate) const ICON_RESOURCE_TYPE: u16 = 1;

//===========================================================================//

/// The ICONDIR struct at the start of every ICO file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct FileHeader {
    reserved: u16,
    restype: u16,
    num_entries: u16,
}

impl FileHeader {
    /// Creates the header of an icon file with `num_entries` images.
    pub fn new(num_entries: u16) -> FileHeader {
        FileHeader { reserved: 0, restype: ICON_RESOURCE_TYPE, num_entries }
    }

    /// Returns the number of directory entries that follow the header.
    pub fn num_entries(&self) -> u16 {
        self.num_entries
    }

    /// Reads and validates a file header.
    pub fn read<R: Read>(reader: &mut R) -> Result<FileHeader> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        let restype = reader.read_u16::<LittleEndian>()?;
        let num_entries = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 || restype != ICON_RESOURCE_TYPE {
            return Err(IcoError::CorruptHeader { reserved, restype });
        }
        if num_entries == 0 {
            return Err(IcoError::NoImages);
        }
        Ok(FileHeader { reserved, restype, num_entries })
    }

    /// Writes the header out.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(self.reserved)?;
        writer.write_u16::<LittleEndian>(self.restype)?;
        writer.write_u16::<LittleEndian>(self.num_entries)?;
        Ok(())
    }
}

//===========================================================================//

/// One ICONDIRENTRY struct; describes a single embedded image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct DirectoryEntry {
    width_byte: u8,
    height_byte: u8,
    num_colors: u8,
    reserved: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data_size: u32,
    data_offset: u32,
}

impl DirectoryEntry {
    /// Creates an entry for a payload of `data_size` bytes at `data_offset`.
    /// Only the low eight bits of `width` and `height` are stored, so 256
    /// is written as 0.
    pub fn new(
        width: u32,
        height: u32,
        bits_per_pixel: u16,
        data_size: u32,
        data_offset: u32,
    ) -> DirectoryEntry {
        DirectoryEntry {
            width_byte: width as u8,
            height_byte: height as u8,
            num_colors: 0,
            reserved: 0,
            color_planes: 1,
            bits_per_pixel,
            data_size,
            data_offset,
        }
    }

    /// Returns the width of the image, in pixels, as declared by the
    /// directory.  A stored byte of zero means 256.
    pub fn width(&self) -> u32 {
        if self.width_byte == 0 {
            256
        } else {
            self.width_byte as u32
        }
    }

    /// Returns the height of the image, in pixels, as declared by the
    /// directory.  A stored byte of zero means 256.
    pub fn height(&self) -> u32 {
        if self.height_byte == 0 {
            256
        } else {
            self.height_byte as u32
        }
    }

    /// Returns the palette-size hint (zero for truecolor images).
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the number of color planes.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the declared bits-per-pixel (color depth).
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the length of the payload, in bytes.
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Returns the absolute offset of the payload within the file.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    /// Reads one directory entry.  Payload bounds are not checked here.
    pub fn read<R: Read>(reader: &mut R) -> Result<DirectoryEntry> {
        let width_byte = reader.read_u8()?;
        let height_byte = reader.read_u8()?;
        let num_colors = reader.read_u8()?;
        let reserved = reader.read_u8()?;
        let color_planes = reader.read_u16::<LittleEndian>()?;
        let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
        let data_size = reader.read_u32::<LittleEndian>()?;
        let data_offset = reader.read_u32::<LittleEndian>()?;
        Ok(DirectoryEntry {
            width_byte,
            height_byte,
            num_colors,
            reserved,
            color_planes,
            bits_per_pixel,
            data_size,
            data_offset,
        })
    }

    /// Writes the entry out.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.width_byte)?;
        writer.write_u8(self.height_byte)?;
        writer.write_u8(self.num_colors)?;
        writer.write_u8(self.reserved)?;
        writer.write_u16::<LittleEndian>(self.color_planes)?;
        writer.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        writer.write_u32::<LittleEndian>(self.data_size)?;
        writer.write_u32::<LittleEndian>(self.data_offset)?;
        Ok(())
    }

    /// Returns this entry's payload as a view into `file`.
    pub fn payload<'a>(&self, file: &'a [u8]) -> Result<&'a [u8]> {
        if self.data_size == 0 {
            corrupt_entry!("size={}", self.data_size);
        }
        let start = self.data_offset as usize;
        let end = match start.checked_add(self.data_size as usize) {
            Some(end) => end,
            None => corrupt_entry!(
                "offset={} size={} overflows",
                self.data_offset,
                self.data_size
            ),
        };
        if end > file.len() {
            return Err(IcoError::UnexpectedEnd);
        }
        Ok(&file[start..end])
    }
}

//===========================================================================//

/// Returns true if `payload` is a PNG stream rather than a headerless DIB.
pub fn is_png(payload: &[u8]) -> bool {
    payload.starts_with(&PNG_SIGNATURE)
}

//===========================================================================//

/// The parsed header and directory of an ICO file.
#[derive(Clone, Debug)]
pub struct IconDir {
    header: FileHeader,
    entries: Vec<DirectoryEntry>,
}

impl IconDir {
    /// Parses the header and the directory at the start of `file`.
    pub fn read(file: &[u8]) -> Result<IconDir> {
        let mut reader = Cursor::new(file);
        let header = FileHeader::read(&mut reader)?;
        let num_entries = header.num_entries() as usize;
        let mut entries = Vec::<DirectoryEntry>::with_capacity(num_entries);
        for _ in 0..num_entries {
            entries.push(DirectoryEntry::read(&mut reader)?);
        }
        Ok(IconDir { header, entries })
    }

    /// Returns the file header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Returns the directory entries, in file order.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }
}

//===========================================================================//


//===========================================================================//
