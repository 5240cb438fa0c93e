use std::path::PathBuf;
use thiserror::Error;

/// Result type for dicomsplit operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Error types for dicomsplit operations
///
/// Configuration variants are raised before any file is touched.
/// The remaining variants are fatal I/O failures that abort a run.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Neither a split count nor a series UID list was given
    #[error("Split count unresolved: give a split count or a list of series UIDs")]
    SplitCountUnresolved,

    /// A split count of zero was requested
    #[error("Split count must be at least 1")]
    ZeroSplits,

    /// A per-split list does not have one entry per split
    #[error("Expected {expected} {what}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A caller-supplied UID is not a valid DICOM UID
    #[error("Invalid UID: {0:?}")]
    InvalidUid(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input directory could not be listed
    #[error("Cannot read directory {}: {source}", path.display())]
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An output directory could not be created
    #[error("Cannot create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An output file could not be written
    #[error("Cannot write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: dicom_object::WriteError,
    },
}

/// Errors raised while reading a pixel buffer out of a dataset
///
/// These never abort a run: the affected file is duplicated without cropping.
#[derive(Error, Debug)]
pub enum PixelDataError {
    /// A pixel module attribute is absent or unreadable
    #[error("Missing pixel attribute: {0}")]
    MissingAttribute(&'static str),

    /// The pixel layout cannot be represented as a word array
    #[error("Unsupported pixel layout: {0}")]
    Unsupported(String),

    /// Fewer bytes than rows x columns x samples require
    #[error("Pixel data too short: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    /// Decoding encapsulated pixel data failed
    #[error("Pixel data decoding failed: {0}")]
    Decode(String),

    /// Array shape and buffer length disagree
    #[error("Invalid pixel array shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl From<dicom_pixeldata::Error> for PixelDataError {
    fn from(e: dicom_pixeldata::Error) -> Self {
        PixelDataError::Decode(format!("{}", e))
    }
}

/// Non-fatal conditions met while splitting a file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum SplitWarning {
    /// A piece was shifted to absorb uneven division
    #[error("image axis {axis} not divisible by {n}, split {split} offset 1 pixel from previous split")]
    UnevenSplit { axis: usize, n: usize, split: usize },

    /// Pixel data absent or unreadable, metadata duplicated only
    #[error("pixel data unavailable: {0}")]
    PixelDataUnavailable(String),

    /// The split axis does not exist in the pixel array
    #[error("axis {axis} out of range for a {ndim}-dimensional pixel array")]
    AxisOutOfRange { axis: usize, ndim: usize },

    /// Position, orientation or spacing missing, origin kept
    #[error("image plane attributes missing, ImagePositionPatient kept")]
    MissingGeometry,

    /// A trailing "1" token was ignored when parsing subjects
    #[error("{field} {value:?} ends with \"1\", token ignored")]
    DroppedTrailingToken { field: &'static str, value: String },

    /// Subject count in a patient identifier differs from the split count
    #[error("{field} {value:?} names {found} subjects, expected {expected}")]
    SubjectCountMismatch {
        field: &'static str,
        value: String,
        found: usize,
        expected: usize,
    },
}
