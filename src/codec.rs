//! Payload codec: gzip, then standard base64, split into fixed-width lines
//!
//! The encoded form is pure ASCII and safe inside a Rust string literal.
//! Decoding ignores all ASCII whitespace, so chunk boundaries and line
//! breaks introduced by rendering never matter.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::trace;

/// Width of one encoded line
pub const CHUNK_WIDTH: usize = 80;

/// Upper bound on the buffer reserved up front from a recorded size
const MAX_RESERVE: usize = 1 << 20;

/// Compressed and base64-encoded file contents, kept as fixed-width lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    chunks: Vec<String>,
}

impl EncodedPayload {
    /// Lines of at most [`CHUNK_WIDTH`] characters
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// All lines joined with `\n`
    pub fn joined(&self) -> String {
        self.chunks.join("\n")
    }

    /// Encoded length, not counting line breaks
    pub fn encoded_len(&self) -> usize {
        self.chunks.iter().map(String::len).sum()
    }
}

/// Compress and encode raw file contents
pub fn encode(data: &[u8]) -> std::io::Result<EncodedPayload> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    let encoded = STANDARD.encode(&compressed);

    let chunks = (0..encoded.len())
        .step_by(CHUNK_WIDTH)
        .map(|start| encoded[start..(start + CHUNK_WIDTH).min(encoded.len())].to_string())
        .collect::<Vec<_>>();

    trace!(
        "🗜️ Encoded {} -> {} bytes ({} gzip) in {} lines",
        data.len(),
        encoded.len(),
        compressed.len(),
        chunks.len()
    );
    Ok(EncodedPayload { chunks })
}

/// Decode a payload back into the original bytes
///
/// `expected_size` is the recorded decompressed length; any other length is
/// reported as an error so truncated payloads never pass silently.
pub fn decode(payload: &str, expected_size: u64) -> Result<Vec<u8>, String> {
    let compact: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    let compressed = STANDARD
        .decode(&compact)
        .map_err(|e| format!("invalid base64: {e}"))?;

    // One byte past the recorded size is enough to detect an overlong stream
    let mut decoder = GzDecoder::new(&compressed[..]).take(expected_size.saturating_add(1));
    let reserve = usize::try_from(expected_size).map_or(MAX_RESERVE, |n| n.min(MAX_RESERVE));
    let mut decompressed = Vec::with_capacity(reserve);
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| format!("failed to decompress gzip: {e}"))?;

    if decompressed.len() as u64 != expected_size {
        return Err(format!(
            "decoded {} bytes, expected {}",
            decompressed.len(),
            expected_size
        ));
    }

    trace!(
        "✅ Decoded {} -> {} bytes",
        compressed.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let data = b"hello, embedded world\n".repeat(50);
        let payload = encode(&data).unwrap();
        let decoded = decode(&payload.joined(), data.len() as u64).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_round_trip_empty() {
        let payload = encode(b"").unwrap();
        assert!(!payload.chunks().is_empty());
        assert_eq!(decode(&payload.joined(), 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_chunks_are_fixed_width() {
        // Incompressible-ish input so the payload spans several lines
        let data: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        let payload = encode(&data).unwrap();
        let chunks = payload.chunks();
        assert!(chunks.len() > 2);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.len(), CHUNK_WIDTH);
        }
        assert!(chunks[chunks.len() - 1].len() <= CHUNK_WIDTH);
        assert_eq!(payload.encoded_len(), payload.joined().len() - (chunks.len() - 1));
    }

    #[test]
    fn test_decode_ignores_chunk_boundaries() {
        let data = b"split me anywhere".repeat(20);
        let payload = encode(&data).unwrap();
        let rewrapped = payload.chunks().concat();
        let rewrapped: String = rewrapped
            .as_bytes()
            .chunks(7)
            .map(|c| format!("{}\r\n  ", String::from_utf8_lossy(c)))
            .collect();
        assert_eq!(decode(&rewrapped, data.len() as u64).unwrap(), data);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let data = b"same bytes, same payload";
        assert_eq!(encode(data).unwrap(), encode(data).unwrap());
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        assert!(decode("!!!not base64!!!", 4).is_err());
        // Valid base64 that is not a gzip stream
        assert!(decode("aGVsbG8gd29ybGQ=", 11).is_err());
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let data = b"truncate the tail of this payload".repeat(10);
        let joined = encode(&data).unwrap().chunks().concat();
        let truncated = &joined[..joined.len() / 2];
        // Keep the base64 well-formed so the failure comes from gzip
        let truncated = &truncated[..truncated.len() - truncated.len() % 4];
        assert!(decode(truncated, data.len() as u64).is_err());
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let payload = encode(b"four").unwrap();
        let err = decode(&payload.joined(), 5).unwrap_err();
        assert!(err.contains("expected 5"));
    }

    #[test]
    fn test_oversized_recorded_size_is_an_error() {
        let payload = encode(b"hello").unwrap().joined();
        for size in [u64::MAX, 1 << 40] {
            let err = decode(&payload, size).unwrap_err();
            assert_eq!(err, format!("decoded 5 bytes, expected {size}"));
        }
    }

    #[test]
    fn test_undersized_recorded_size_stops_early() {
        let data = vec![b'x'; 64 * 1024];
        let payload = encode(&data).unwrap().joined();
        let err = decode(&payload, 3).unwrap_err();
        assert_eq!(err, "decoded 4 bytes, expected 3");
    }
}
