//! Core type definitions for splitting DICOM volumes
//!
//! - [`SplitConfig`]: how a directory is split and re-tagged
//! - [`StudyUidMode`]: study UID assignment strategy
//! - [`ImageType`]: decomposed DICOM ImageType field
//! - [`PixelSpacing`], [`ImagePosition`], [`ImageOrientation`]: image plane attributes
//! - [`SpatialGeometry`]: the three plane attributes together

mod config;
mod geometry;
mod image_type;
mod pixel_spacing;

pub use config::{
    SplitConfig, StudyUidMode, DEFAULT_DERIVATION_DESCRIPTION, DEFAULT_PATIENT_DELIMITER,
};
pub use geometry::{ImageOrientation, ImagePosition, SpatialGeometry};
pub use image_type::ImageType;
pub use pixel_spacing::PixelSpacing;
