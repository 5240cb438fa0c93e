//! Split DICOM volumes that image several subjects at once
//!
//! Each pixel array is cut into `n` equal pieces along one axis. Every piece
//! is written as its own instance with a recomputed ImagePositionPatient,
//! fresh UIDs, per-subject patient identifiers and derivation provenance.

pub mod api;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod identity;
pub mod split;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::{make_output_paths, DicomSplitter, FileWarning, SplitSummary};
pub use cli::report::TextReport;
pub use dataset::{DicomDirectory, DicomEntry, PixelBuffer};
pub use error::{PixelDataError, Result, SplitError, SplitWarning};
pub use split::{affine, AxisSlice, AxisSplitter, SplitDescriptor};
pub use types::*;
