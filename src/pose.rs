//! Camera pose flattening.
//!
//! The consumer boundary speaks flat 16-element arrays, not matrix types.
//! The layout is fixed as **column-major**: elements 0..3 are the first
//! column of the 4x4 camera transform, and the translation lands at
//! indices 12..14. This matches nalgebra's internal storage, so the
//! flattening is a straight slice copy.

use nalgebra::Matrix4;

/// Column-major 16-value flattening of a 4x4 rigid transform.
///
/// Value type: re-derived fresh every frame, freely copyable, no ties to
/// the frame it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseMatrix(pub [f32; 16]);

impl PoseMatrix {
    /// Flatten a camera transform column by column.
    pub fn from_transform(transform: &Matrix4<f32>) -> Self {
        let mut values = [0.0f32; 16];
        values.copy_from_slice(transform.as_slice());
        Self(values)
    }

    /// Translation component (elements 12..14).
    pub fn translation(&self) -> [f32; 3] {
        [self.0[12], self.0[13], self.0[14]]
    }

    /// The flat values, column-major.
    pub fn values(&self) -> &[f32; 16] {
        &self.0
    }
}

impl From<PoseMatrix> for [f32; 16] {
    fn from(pose: PoseMatrix) -> Self {
        pose.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattening_is_column_major() {
        let mut m = Matrix4::<f32>::identity();
        m[(0, 3)] = 5.0;
        m[(1, 3)] = 2.0;
        m[(2, 3)] = -3.0;

        let pose = PoseMatrix::from_transform(&m);
        let expected = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            5.0, 2.0, -3.0, 1.0,
        ];
        assert_eq!(*pose.values(), expected);
        assert_eq!(pose.translation(), [5.0, 2.0, -3.0]);
    }
}
