//! Errors raised while turning a sonar file into a waterfall

use std::path::PathBuf;

/// Everything that can go wrong between reading datagrams and writing the image
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file contained no depth pings with more than one beam.
    ///
    /// This is not fatal for a batch: the file is skipped.
    #[error("no usable depth pings")]
    EmptyInput,

    /// The palette file is missing or malformed
    #[error("unable to load palette {path}: {reason}")]
    PaletteLoad {
        /// The palette that failed to load
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// The datagram stream is malformed or truncated
    #[error("malformed datagram stream: {0}")]
    StreamRead(#[from] binrw::Error),

    /// A datagram carried a date or time that does not exist
    #[error("invalid datagram timestamp: {0}")]
    Timestamp(#[from] time::error::ComponentRange),

    /// A label could not be rasterized
    #[error("unable to render annotation: {0}")]
    Annotation(String),

    /// The output image could not be written
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Some files of a batch could not be processed
    #[error("{failed} of {total} files failed")]
    BatchFailed {
        /// Number of files that failed
        failed: usize,
        /// Number of files in the batch
        total: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
