//!                                Codec errors                               //!
//!
//! Copyright 2024-2025 HaמuL
//! Description: Error taxonomy for configuration-time failures

use thiserror::Error;

/// Configuration errors returned synchronously by fallible constructors.
///
/// Everything past construction (framing errors, CRC mismatches, ECC failures, profile-decoder
/// failures) is handled by best-effort substitution inside the streaming loops and never
/// surfaces as an `Err` here — see the decoder/repairer modules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid profile {0}, available: 0, 1, 2, 4")]
    InvalidProfile(u8),

    #[error("invalid sample rate {0} for profile {1}")]
    InvalidSampleRate(u32, u8),

    #[error("invalid channel count {0}")]
    InvalidChannels(i16),

    #[error("invalid bit depth {0} for profile {1}")]
    InvalidBitDepth(i16, u8),

    #[error("invalid frame size {0}, must be 1..={1}")]
    InvalidFrameSize(u32, u32),
}
