//! Matrices for the fixed-function pipeline.

use std::f32::consts::PI;

/// A 4x4 matrix stored column-major, as `glLoadMatrixf` expects it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub d: [f32; 16],
}

impl Mat4 {
    pub const fn identity() -> Self {
        #[rustfmt::skip]
        let d = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        Self { d }
    }

    /// Element at `row` and `column`.
    pub fn at(&self, row: usize, column: usize) -> f32 {
        self.d[column * 4 + row]
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.d.as_ptr()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Perspective projection, the same matrix `gluPerspective` builds.
///
/// `fovy` is the vertical field of view in degrees.
pub fn perspective(fovy: f32, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
    let f = 1.0 / (fovy * PI / 360.0).tan();
    let depth = z_near - z_far;

    let mut m = Mat4 { d: [0.0; 16] };
    m.d[0] = f / aspect;
    m.d[5] = f;
    m.d[10] = (z_far + z_near) / depth;
    m.d[11] = -1.0;
    m.d[14] = 2.0 * z_far * z_near / depth;
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn identity_diagonal() {
        let m = Mat4::identity();
        for row in 0..4 {
            for column in 0..4 {
                assert_eq!(m.at(row, column), if row == column { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn right_angle_fov_has_unit_focal_length() {
        let m = perspective(90.0, 1.0, 1.0, 100.0);
        assert_close(m.at(0, 0), 1.0);
        assert_close(m.at(1, 1), 1.0);
    }

    #[test]
    fn aspect_scales_only_x() {
        let square = perspective(65.0, 1.0, 1.0, 100.0);
        let wide = perspective(65.0, 800.0 / 480.0, 1.0, 100.0);
        assert_close(wide.at(0, 0), square.at(0, 0) * 480.0 / 800.0);
        assert_close(wide.at(1, 1), square.at(1, 1));
    }

    #[test]
    fn depth_terms_are_column_major() {
        let m = perspective(65.0, 1.0, 1.0, 100.0);
        assert_close(m.at(2, 2), -101.0 / 99.0);
        assert_close(m.at(3, 2), -1.0);
        assert_close(m.at(2, 3), -200.0 / 99.0);
        assert_close(m.at(3, 3), 0.0);
        // `w = -z` lives in the third column of the fourth row.
        assert_close(m.d[11], -1.0);
    }

    #[test]
    fn near_and_far_planes_map_to_clip_bounds() {
        let (near, far) = (1.0, 100.0);
        let m = perspective(65.0, 1.0, near, far);
        let ndc_z = |z: f32| (m.at(2, 2) * z + m.at(2, 3)) / (m.at(3, 2) * z);
        assert_close(ndc_z(-near), -1.0);
        assert_close(ndc_z(-far), 1.0);
    }
}
