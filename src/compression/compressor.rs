use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use tracing::debug;

/// Compression algorithm selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// No compression
    None,
    /// LZ4 - Fast compression/decompression (default)
    #[default]
    Lz4,
    /// Zstandard - Better compression ratio
    Zstd,
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Lz4 => write!(f, "lz4"),
            Self::Zstd => write!(f, "zstd"),
        }
    }
}

/// Compression configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Enable compression for stored values
    pub enabled: bool,
    /// Minimum value size to compress (bytes)
    pub min_size: usize,
    /// Algorithm applied to values above the threshold
    pub algorithm: CompressionAlgorithm,
    /// Zstd compression level (1-22)
    pub zstd_level: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_size: 1024, // Don't compress < 1KB
            algorithm: CompressionAlgorithm::Lz4,
            zstd_level: 3, // Balanced compression
        }
    }
}

/// Byte-level transform applied to values above the configured threshold.
///
/// The caller decides *whether* to compress via [`Compressor::should_compress`]
/// and records that decision alongside the stored value; `compress` and
/// `decompress` always apply the configured algorithm.
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create new compressor with configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    /// Whether a value of this size is worth compressing
    pub fn should_compress(&self, data: &[u8]) -> bool {
        self.config.enabled
            && self.config.algorithm != CompressionAlgorithm::None
            && data.len() > self.config.min_size
    }

    /// Compress data with the configured algorithm
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        match self.config.algorithm {
            CompressionAlgorithm::None => Ok(data.to_vec()),
            CompressionAlgorithm::Lz4 => self.compress_lz4(data),
            CompressionAlgorithm::Zstd => self.compress_zstd(data),
        }
    }

    /// Decompress data with the configured algorithm
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        match self.config.algorithm {
            CompressionAlgorithm::None => Ok(data.to_vec()),
            CompressionAlgorithm::Lz4 => self.decompress_lz4(data),
            CompressionAlgorithm::Zstd => self.decompress_zstd(data),
        }
    }

    fn compress_lz4(&self, data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let mut encoder = lz4::EncoderBuilder::new()
            .level(4) // Fast compression
            .build(Vec::new())?;

        encoder.write_all(data)?;
        let (compressed, result) = encoder.finish();
        result?;

        debug!(
            "LZ4 compressed: {} -> {} bytes",
            data.len(),
            compressed.len()
        );
        Ok(compressed)
    }

    fn decompress_lz4(&self, data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let mut decoder = lz4::Decoder::new(data)?;
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;

        debug!(
            "LZ4 decompressed: {} -> {} bytes",
            data.len(),
            decompressed.len()
        );
        Ok(decompressed)
    }

    fn compress_zstd(&self, data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let compressed = zstd::encode_all(data, self.config.zstd_level)?;

        debug!(
            "Zstd compressed: {} -> {} bytes",
            data.len(),
            compressed.len()
        );
        Ok(compressed)
    }

    fn decompress_zstd(&self, data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let decompressed = zstd::decode_all(data)?;

        debug!(
            "Zstd decompressed: {} -> {} bytes",
            data.len(),
            decompressed.len()
        );
        Ok(decompressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lz4_round_trip() {
        let config = CompressionConfig {
            enabled: true,
            min_size: 10,
            ..Default::default()
        };
        let compressor = Compressor::new(config);

        let data = b"Hello, World! This is a test string that should compress well.".repeat(10);
        let compressed = compressor.compress(&data).unwrap();
        assert!(compressed.len() < data.len());

        let decompressed = compressor.decompress(&compressed).unwrap();
        assert_eq!(data.to_vec(), decompressed);
    }

    #[test]
    fn test_zstd_round_trip() {
        let config = CompressionConfig {
            enabled: true,
            min_size: 10,
            algorithm: CompressionAlgorithm::Zstd,
            ..Default::default()
        };
        let compressor = Compressor::new(config);

        let data = b"Hello, World! This is a test string that should compress well.".repeat(10);
        let compressed = compressor.compress(&data).unwrap();
        assert!(compressed.len() < data.len());

        let decompressed = compressor.decompress(&compressed).unwrap();
        assert_eq!(data.to_vec(), decompressed);
    }

    #[test]
    fn test_should_compress_respects_threshold() {
        let config = CompressionConfig {
            enabled: true,
            min_size: 1024,
            ..Default::default()
        };
        let compressor = Compressor::new(config);

        assert!(compressor.should_compress(&vec![0u8; 2048]));
        assert!(!compressor.should_compress(&vec![0u8; 512]));
        assert!(!compressor.should_compress(&vec![0u8; 1024]));
    }

    #[test]
    fn test_should_compress_disabled() {
        let compressor = Compressor::new(CompressionConfig::default());
        assert!(!compressor.should_compress(&vec![0u8; 1_000_000]));
    }

    #[test]
    fn test_should_compress_none_algorithm() {
        let config = CompressionConfig {
            enabled: true,
            min_size: 10,
            algorithm: CompressionAlgorithm::None,
            ..Default::default()
        };
        let compressor = Compressor::new(config);
        assert!(!compressor.should_compress(&vec![0u8; 2048]));
    }
}
