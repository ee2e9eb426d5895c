//===========================================================================//

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BmpDepth {
    One,
    Two,
    Four,
    Eight,
    Sixteen,
    TwentyFour,
    ThirtyTwo,
}

impl BmpDepth {
    pub(crate) fn from_bits_per_pixel(
        bits_per_pixel: u16,
    ) -> Option<BmpDepth> {
        match bits_per_pixel {
            1 => Some(BmpDepth::One),
            2 => Some(BmpDepth::Two),
            4 => Some(BmpDepth::Four),
            8 => Some(BmpDepth::Eight),
            16 => Some(BmpDepth::Sixteen),
            24 => Some(BmpDepth::TwentyFour),
            32 => Some(BmpDepth::ThirtyTwo),
            _ => None,
        }
    }

    pub(crate) fn bits_per_pixel(&self) -> u16 {
        match *self {
            BmpDepth::One => 1,
            BmpDepth::Two => 2,
            BmpDepth::Four => 4,
            BmpDepth::Eight => 8,
            BmpDepth::Sixteen => 16,
            BmpDepth::TwentyFour => 24,
            BmpDepth::ThirtyTwo => 32,
        }
    }

    /// Returns the full color table length for this depth (zero for
    /// truecolor depths).
    pub(crate) fn num_colors(&self) -> u32 {
        match *self {
            BmpDepth::One => 2,
            BmpDepth::Two => 4,
            BmpDepth::Four => 16,
            BmpDepth::Eight => 256,
            _ => 0,
        }
    }

    pub(crate) fn is_indexed(&self) -> bool {
        self.num_colors() > 0
    }
}

/// Returns the number of color table entries a DIB with the given depth and
/// `biClrUsed` value carries.  A `colors_used` of zero, or one larger than
/// the depth allows, means the full table.
pub(crate) fn color_table_len(bits_per_pixel: u16, colors_used: u32) -> u32 {
    match BmpDepth::from_bits_per_pixel(bits_per_pixel) {
        Some(depth) if depth.is_indexed() => {
            let max = depth.num_colors();
            if colors_used == 0 || colors_used > max {
                max
            } else {
                colors_used
            }
        }
        _ => 0,
    }
}

/// Returns the size of one row of `width` pixels at `bits_per_pixel`,
/// padded to a multiple of four bytes.
pub(crate) fn row_stride(width: u32, bits_per_pixel: u16) -> u64 {
    (width as u64 * bits_per_pixel as u64).div_ceil(32) * 4
}

//===========================================================================//


//===========================================================================//
