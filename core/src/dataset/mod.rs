//! Reading source datasets and writing split pixel data

mod pixels;
mod source;
pub mod tags;

pub use pixels::{read_pixel_buffer, set_pixel_data, use_native_encoding, PixelBuffer, PixelWords};
pub use source::{DicomDirectory, DicomEntry, SkipReason, SkippedFile};
