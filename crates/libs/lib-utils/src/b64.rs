//! # Base64 Encoding/Decoding
//!
//! Utilities for base64 encoding and decoding. The wallet protocol and the
//! settlement backend both carry transaction bytes in the standard alphabet
//! with padding.

use base64::{engine::general_purpose, Engine as _};

/// Encode bytes to a standard base64 string.
pub fn b64_encode(content: impl AsRef<[u8]>) -> String {
    general_purpose::STANDARD.encode(content)
}

/// Decode a standard base64 string to bytes.
pub fn b64_decode(b64: &str) -> Result<Vec<u8>, Error> {
    general_purpose::STANDARD
        .decode(b64)
        .map_err(|_| Error::FailToB64Decode)
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToB64Decode,
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_b64_round_trip() {
        let bytes = [0u8, 1, 2, 253, 254, 255];
        assert_eq!(b64_decode(&b64_encode(bytes)).unwrap(), bytes);
    }

    #[test]
    fn test_b64_decode_rejects_garbage() {
        assert!(b64_decode("not base64!").is_err());
    }
}
