use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrError {
    #[error("payload of {len} bytes does not fit in a QR symbol: {reason}")]
    Capacity { len: usize, reason: String },

    #[error("invalid color {0:?}, expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("invalid error-correction level {0:?}, expected L, M, Q or H")]
    InvalidLevel(String),

    #[error("QR image of {requested}px exceeds the {max}px limit")]
    InvalidSize { requested: u64, max: u32 },

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("unknown resident id {0}")]
    UnknownResident(u32),

    #[error("QR generation already running for resident {0}")]
    Busy(u32),

    #[error("no payment selected")]
    NoSelection,

    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Qr(#[from] QrError),

    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
