use crate::dataset::tags::{put_strs, IMAGE_TYPE};
use dicom_core::VR;
use dicom_object::InMemDicomObject;

/// DICOM ImageType field decomposed into its components
///
/// - `pixels`: first value (e.g. "ORIGINAL", "DERIVED")
/// - `exam`: second value (e.g. "PRIMARY", "SECONDARY")
/// - `flavor`: third value, if any
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageType {
    pub pixels: String,
    pub exam: String,
    pub flavor: Option<String>,
}

impl ImageType {
    /// Creates a new ImageType
    pub fn new(pixels: &str, exam: &str, flavor: Option<&str>) -> Self {
        Self {
            pixels: pixels.to_string(),
            exam: exam.to_string(),
            flavor: flavor.map(str::to_string),
        }
    }

    /// Image type written on every split output: DERIVED\PRIMARY\SPLIT
    pub fn split() -> Self {
        Self::new("DERIVED", "PRIMARY", Some("SPLIT"))
    }

    /// All values in order
    pub fn values(&self) -> Vec<String> {
        let mut values = vec![self.pixels.clone(), self.exam.clone()];
        values.extend(self.flavor.iter().cloned());
        values
    }

    /// Replaces ImageType (CS) on `dcm`
    pub fn write_to(&self, dcm: &mut InMemDicomObject) {
        put_strs(dcm, IMAGE_TYPE, VR::CS, self.values());
    }
}
