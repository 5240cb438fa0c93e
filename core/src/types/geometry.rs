use crate::dataset::tags::{
    format_decimal_string, get_multi_float_value, get_string_value, IMAGE_ORIENTATION_PATIENT,
    IMAGE_POSITION_PATIENT, PIXEL_SPACING,
};
use crate::types::PixelSpacing;
use dicom_object::InMemDicomObject;
use nalgebra::Vector3;
use std::fmt;

/// Patient-space position of the first transmitted pixel (ImagePositionPatient)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImagePosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ImagePosition {
    /// Creates a new ImagePosition
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Reads ImagePositionPatient, `None` unless exactly three values are present
    pub fn from_dataset(dcm: &InMemDicomObject) -> Option<Self> {
        match get_multi_float_value(dcm, IMAGE_POSITION_PATIENT)?.as_slice() {
            [x, y, z] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Decimal string (DS) values suitable for ImagePositionPatient
    pub fn to_decimal_strings(&self) -> [String; 3] {
        [
            format_decimal_string(self.x),
            format_decimal_string(self.y),
            format_decimal_string(self.z),
        ]
    }
}

impl fmt::Display for ImagePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Direction cosines of the image rows and columns (ImageOrientationPatient)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageOrientation {
    /// Direction of increasing column index along a row (first three values)
    pub row: [f64; 3],
    /// Direction of increasing row index down a column (last three values)
    pub column: [f64; 3],
}

impl ImageOrientation {
    /// Creates a new ImageOrientation
    pub fn new(row: [f64; 3], column: [f64; 3]) -> Self {
        Self { row, column }
    }

    /// Reads ImageOrientationPatient, `None` unless exactly six values are present
    pub fn from_dataset(dcm: &InMemDicomObject) -> Option<Self> {
        match get_multi_float_value(dcm, IMAGE_ORIENTATION_PATIENT)?.as_slice() {
            [rx, ry, rz, cx, cy, cz] => Some(Self::new([*rx, *ry, *rz], [*cx, *cy, *cz])),
            _ => None,
        }
    }
}

/// Everything needed to place an array index in patient space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialGeometry {
    pub position: ImagePosition,
    pub orientation: ImageOrientation,
    pub spacing: PixelSpacing,
}

impl SpatialGeometry {
    /// Reads position, orientation and pixel spacing
    ///
    /// Returns `None` if any of the three is absent or malformed.
    pub fn from_dataset(dcm: &InMemDicomObject) -> Option<Self> {
        Some(Self {
            position: ImagePosition::from_dataset(dcm)?,
            orientation: ImageOrientation::from_dataset(dcm)?,
            spacing: pixel_spacing_from_dataset(dcm)?,
        })
    }
}

/// Reads PixelSpacing, falling back to lenient string parsing
fn pixel_spacing_from_dataset(dcm: &InMemDicomObject) -> Option<PixelSpacing> {
    if let Some(values) = get_multi_float_value(dcm, PIXEL_SPACING) {
        if let [row, col] = values.as_slice() {
            return Some(PixelSpacing::new(*row, *col));
        }
    }
    get_string_value(dcm, PIXEL_SPACING).and_then(|s| PixelSpacing::parse(&s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tags::put_strs;
    use dicom_core::VR;

    fn plane_dataset() -> InMemDicomObject {
        let mut dcm = InMemDicomObject::new_empty();
        put_strs(&mut dcm, IMAGE_POSITION_PATIENT, VR::DS, ["-10", "20.5", "3"]);
        put_strs(
            &mut dcm,
            IMAGE_ORIENTATION_PATIENT,
            VR::DS,
            ["1", "0", "0", "0", "1", "0"],
        );
        put_strs(&mut dcm, PIXEL_SPACING, VR::DS, ["0.5", "0.75"]);
        dcm
    }

    #[test]
    fn test_geometry_from_dataset() {
        let geometry = SpatialGeometry::from_dataset(&plane_dataset()).unwrap();
        assert_eq!(geometry.position, ImagePosition::new(-10.0, 20.5, 3.0));
        assert_eq!(geometry.orientation.row, [1.0, 0.0, 0.0]);
        assert_eq!(geometry.orientation.column, [0.0, 1.0, 0.0]);
        assert_eq!(geometry.spacing, PixelSpacing::new(0.5, 0.75));
    }

    #[test]
    fn test_geometry_requires_all_tags() {
        let mut dcm = plane_dataset();
        dcm.remove_element(PIXEL_SPACING);
        assert!(SpatialGeometry::from_dataset(&dcm).is_none());

        let mut dcm = plane_dataset();
        dcm.remove_element(IMAGE_ORIENTATION_PATIENT);
        assert!(SpatialGeometry::from_dataset(&dcm).is_none());
    }

    #[test]
    fn test_position_rejects_wrong_multiplicity() {
        let mut dcm = InMemDicomObject::new_empty();
        put_strs(&mut dcm, IMAGE_POSITION_PATIENT, VR::DS, ["1", "2"]);
        assert!(ImagePosition::from_dataset(&dcm).is_none());
    }

    #[test]
    fn test_to_decimal_strings() {
        let position = ImagePosition::new(-90.0, 0.1 + 0.2, 1.0 / 3.0);
        let [x, y, z] = position.to_decimal_strings();
        assert_eq!(x, "-90");
        assert_eq!(y, "0.3");
        assert_eq!(z, "0.33333333333333");
    }
}
