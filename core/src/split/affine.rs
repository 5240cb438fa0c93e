use crate::types::{ImageOrientation, ImagePosition, PixelSpacing, SpatialGeometry};
use nalgebra::{Matrix3x2, Matrix4, Vector3, Vector4};

/// Builds the 4x4 transform from (row, column, 0, 1) array indices to
/// patient coordinates
///
/// The direction matrix stacks the column cosines (last three orientation
/// values) then the row cosines (first three); the row index steps along
/// the column direction by the row spacing and the column index along the
/// row direction by the column spacing.
///
/// # Example
///
/// ```
/// use dicomsplit_core::split::affine;
/// use dicomsplit_core::{ImageOrientation, ImagePosition, PixelSpacing};
/// use nalgebra::Vector4;
///
/// let matrix = affine(
///     &ImagePosition::new(0.0, 0.0, 0.0),
///     &ImageOrientation::new([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
///     &PixelSpacing::new(1.0, 1.0),
/// );
/// let index = Vector4::new(4.0, 2.0, 0.0, 1.0);
/// assert_eq!(matrix * index, index);
/// ```
pub fn affine(
    position: &ImagePosition,
    orientation: &ImageOrientation,
    spacing: &PixelSpacing,
) -> Matrix4<f64> {
    let column = Vector3::from(orientation.column);
    let row = Vector3::from(orientation.row);
    let f = Matrix3x2::from_columns(&[column, row]);
    let s = position.to_vector();
    let (delta_r, delta_c) = (spacing.row, spacing.col);

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        f[(0, 0)] * delta_r, f[(0, 1)] * delta_c, 0.0, s[0],
        f[(1, 0)] * delta_r, f[(1, 1)] * delta_c, 0.0, s[1],
        f[(2, 0)] * delta_r, f[(2, 1)] * delta_c, 0.0, s[2],
        0.0, 0.0, 0.0, 1.0,
    );
    matrix
}

/// Maps an in-plane array index (row, column) to a patient-space position
pub fn patient_position(matrix: &Matrix4<f64>, row: usize, column: usize) -> ImagePosition {
    let index = Vector4::new(row as f64, column as f64, 0.0, 1.0);
    let mapped = matrix * index;
    ImagePosition::new(mapped[0], mapped[1], mapped[2])
}

impl SpatialGeometry {
    /// Affine transform of this image plane
    pub fn affine(&self) -> Matrix4<f64> {
        affine(&self.position, &self.orientation, &self.spacing)
    }

    /// Patient-space position of the array element at (row, column)
    pub fn position_of(&self, row: usize, column: usize) -> ImagePosition {
        patient_position(&self.affine(), row, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_like_orientation() {
        let matrix = affine(
            &ImagePosition::new(0.0, 0.0, 0.0),
            &ImageOrientation::new([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
            &PixelSpacing::new(1.0, 1.0),
        );
        let vector = Vector4::new(4.0, 2.0, 0.0, 1.0);
        assert_eq!(matrix * vector, vector);
    }

    #[test]
    fn test_axial_plane_with_spacing_and_origin() {
        // Axial: rows run along +x, columns down +y
        let geometry = SpatialGeometry {
            position: ImagePosition::new(-100.0, -50.0, 20.0),
            orientation: ImageOrientation::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            spacing: PixelSpacing::new(0.5, 0.25),
        };

        let moved = geometry.position_of(0, 40);
        assert_eq!(moved, ImagePosition::new(-90.0, -50.0, 20.0));

        let moved = geometry.position_of(8, 0);
        assert_eq!(moved, ImagePosition::new(-100.0, -46.0, 20.0));
    }

    #[test]
    fn test_origin_is_unchanged_at_zero_index() {
        let geometry = SpatialGeometry {
            position: ImagePosition::new(12.5, -3.0, 7.25),
            orientation: ImageOrientation::new([0.0, 1.0, 0.0], [0.0, 0.0, -1.0]),
            spacing: PixelSpacing::new(0.8, 0.8),
        };
        assert_eq!(geometry.position_of(0, 0), geometry.position);
    }

    #[test]
    fn test_matrix_layout() {
        let matrix = affine(
            &ImagePosition::new(1.0, 2.0, 3.0),
            &ImageOrientation::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            &PixelSpacing::new(2.0, 3.0),
        );
        assert_eq!(
            matrix.row(3).iter().copied().collect::<Vec<_>>(),
            vec![0.0, 0.0, 0.0, 1.0]
        );
        assert_eq!(matrix[(2, 0)], 2.0);
        assert_eq!(matrix[(0, 1)], 3.0);
        assert_eq!(matrix[(2, 3)], 3.0);
    }
}
