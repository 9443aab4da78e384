//! Archive reading boundary
//!
//! The proprietary on-disk measurement format is decoded by external
//! tooling; this converter consumes the already-materialized record graph.
//! [`ArchiveReader`] is the seam between the two: hosts plug in whatever
//! decoder they run, and the shipped [`JsonArchiveReader`] accepts the JSON
//! interchange form that decoder emits.
//!
//! Readers distinguish "not my format" (an expected, silent outcome) from
//! real failures: the former is `Ok(None)`, the latter an error.

use crate::Result;
use crate::app::models::source::DataFile;
use tracing::debug;

/// Decoder seam for raw measurement archives
pub trait ArchiveReader {
    /// Decode one source record from raw archive bytes
    ///
    /// Returns `Ok(None)` when the bytes are not this reader's format, so
    /// callers can silently hand the input to the next handler.
    fn read(&self, bytes: &[u8]) -> Result<Option<DataFile>>;
}

/// Reader for the JSON interchange form of a decoded measurement record
#[derive(Debug, Default)]
pub struct JsonArchiveReader;

impl ArchiveReader for JsonArchiveReader {
    fn read(&self, bytes: &[u8]) -> Result<Option<DataFile>> {
        match serde_json::from_slice::<DataFile>(bytes) {
            Ok(data_file) => Ok(Some(data_file)),
            Err(error) => {
                debug!("Input is not a decoded measurement record: {error}");
                Ok(None)
            }
        }
    }
}
