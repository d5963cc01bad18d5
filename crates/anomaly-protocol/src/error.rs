/// Errors produced while decoding a message payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A read would run past the end of the payload.
    #[error("message truncated at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The content type byte is not image, font or sound.
    #[error("unknown content type {0}")]
    UnknownContentKind(u8),

    /// The declared record count cannot fit in the rest of the payload.
    #[error("record count {count} cannot fit in {remaining} remaining bytes")]
    TooManyRecords { count: u32, remaining: usize },
}

/// Errors produced while encoding a message payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A length or count does not fit its `u32` prefix.
    #[error("{field} of {len} does not fit a u32 prefix")]
    TooLong { field: &'static str, len: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
