//! Tile decoding errors.

use thiserror::Error;

/// Errors raised while turning a raw payload into layers.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload carried the gzip magic number but could not be inflated
    #[error("Failed to decompress tile payload: {0}")]
    Decompression(#[source] std::io::Error),

    /// Protobuf structure or geometry stream is malformed
    #[error("Corrupt tile: {reason}")]
    CorruptTile { reason: String },
}

impl CodecError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        CodecError::CorruptTile {
            reason: reason.into(),
        }
    }
}

impl From<prost::DecodeError> for CodecError {
    fn from(err: prost::DecodeError) -> Self {
        CodecError::corrupt(err.to_string())
    }
}
