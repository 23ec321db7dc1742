//! Error types for producer-side operations.

use std::fmt;

/// Failures while turning an inbound event into publishable text.
///
/// None of these are fatal: the affected event is logged and skipped, and
/// nothing is retried.
#[derive(Debug)]
pub enum Error {
    /// The media attachment could not be fetched from the messaging service.
    Download(String),

    /// The downloaded bytes are not a supported image (PNG or JPEG).
    ImageDecode(String),

    /// The image decoded fine but contains no QR code.
    QrNotFound,

    /// A QR code was found but its content could not be read.
    QrDecode(String),

    /// The messaging client failed to connect or lost its session.
    Connection(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Download(msg) => write!(f, "Download error: {}", msg),
            Error::ImageDecode(msg) => write!(f, "Image decode error: {}", msg),
            Error::QrNotFound => write!(f, "QR decode error: no QR code found"),
            Error::QrDecode(msg) => write!(f, "QR decode error: {}", msg),
            Error::Connection(msg) => write!(f, "Connection error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}

impl From<rqrr::DeQRError> for Error {
    fn from(err: rqrr::DeQRError) -> Self {
        Error::QrDecode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
