//! Compression utilities for PDF streams

use crate::error::{PdfError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Default deflate level for font programs and image masks.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Compress data using Flate/Zlib compression
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(data).map_err(PdfError::Io)?;
    encoder.finish().map_err(PdfError::Io)
}

/// Decompress data using Flate/Zlib decompression
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| PdfError::CompressionError(e.to_string()))?;
    Ok(decompressed)
}

/// A zlib encoder kept alive for the whole document and reset per stream.
pub struct StreamCompressor {
    encoder: ZlibEncoder<Vec<u8>>,
}

impl StreamCompressor {
    pub fn new(level: u32) -> Self {
        Self {
            encoder: ZlibEncoder::new(Vec::new(), Compression::new(level.min(9))),
        }
    }

    /// Deflates `data` as one complete zlib stream.
    pub fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.encoder.write_all(data).map_err(PdfError::Io)?;
        self.encoder
            .reset(Vec::new())
            .map_err(|e| PdfError::CompressionError(e.to_string()))
    }
}
