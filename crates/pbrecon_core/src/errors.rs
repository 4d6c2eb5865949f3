use thiserror::Error;

#[derive(Debug, Error)]
pub enum PbreconError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid field width {0} (expected 8, 16 or 32)")]
    InvalidFieldWidth(u32),

    #[error("unknown scalar type code {code:#x}")]
    UnknownScalarType { code: u8 },

    #[error("unknown allocation type {raw}")]
    UnknownAllocationType { raw: u8 },

    #[error("oneof field continues a group, but no oneof field came before it")]
    MissingOneofStart,

    #[error("no terminator record within {limit} fields")]
    UnterminatedDescriptorArray { limit: usize },

    #[error("read of {len} bytes at {addr:#x} is outside the image")]
    OutOfBounds { addr: u64, len: usize },
}

pub type Result<T> = std::result::Result<T, PbreconError>;
