//===========================================================================//

macro_rules! corrupt_entry {
    ($e:expr) => {
        return Err($crate::error::IcoError::CorruptEntry(($e).to_string()))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::CorruptEntry(
            format!($fmt, $($arg)+)))
    };
}

macro_rules! corrupt_bmp {
    ($e:expr) => {
        return Err($crate::error::IcoError::CorruptBitmapGeometry(
            ($e).to_string()))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::CorruptBitmapGeometry(
            format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_bmp {
    ($e:expr) => {
        return Err($crate::error::IcoError::InvalidBitmap(($e).to_string()))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::InvalidBitmap(
            format!($fmt, $($arg)+)))
    };
}

macro_rules! unsupported_bmp {
    ($e:expr) => {
        return Err($crate::error::IcoError::UnsupportedBitmap(
            ($e).to_string()))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::IcoError::UnsupportedBitmap(
            format!($fmt, $($arg)+)))
    };
}

//===========================================================================//
