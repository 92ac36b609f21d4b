//! Pluggable compression codec used by the deep storage tier.
//!
//! The concrete codec is gzip deflate via `flate2`. Its wire format alone
//! carries no reliable original-size field, so `compress` prepends an
//! 8-byte little-endian original-size header before the gzip stream —
//! this is the "frame header" [`Compressor::decompress`] requires, mirroring
//! the original service's reliance on `ZSTD_getFrameContentSize` to refuse
//! decompressing data it can't size up front.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

const HEADER_LEN: usize = 8;

pub trait Compressor: Send + Sync {
    fn compress(&self, input: &[u8], level: u32) -> Option<Vec<u8>>;
    fn decompress(&self, input: &[u8]) -> Option<Vec<u8>>;
    fn postfix(&self) -> &'static str;
}

pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn compress(&self, input: &[u8], level: u32) -> Option<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
        encoder.write_all(input).ok()?;
        let gzipped = encoder.finish().ok()?;

        let mut out = Vec::with_capacity(HEADER_LEN + gzipped.len());
        out.extend_from_slice(&(input.len() as u64).to_le_bytes());
        out.extend_from_slice(&gzipped);
        Some(out)
    }

    fn decompress(&self, input: &[u8]) -> Option<Vec<u8>> {
        if input.len() < HEADER_LEN {
            return None;
        }
        let mut len_bytes = [0u8; HEADER_LEN];
        len_bytes.copy_from_slice(&input[..HEADER_LEN]);
        let original_size = u64::from_le_bytes(len_bytes) as usize;

        let mut decoder = GzDecoder::new(&input[HEADER_LEN..]);
        let mut out = Vec::with_capacity(original_size);
        decoder.read_to_end(&mut out).ok()?;
        Some(out)
    }

    fn postfix(&self) -> &'static str {
        ".gz"
    }
}
