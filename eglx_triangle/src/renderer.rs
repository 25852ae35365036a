//! Immediate mode drawing of the rotating triangle.

use crate::gl;
use crate::gl_loader::GlFunctions;
use crate::math;

/// Vertical field of view of the projection, in degrees.
const FOV_Y: f32 = 65.0;
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 100.0;

/// Rotation speed around the triangle's z axis, in degrees per time unit.
const DEGREES_PER_UNIT: f64 = 100.0;

/// A colored vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub color: [f32; 4],
    pub position: [f32; 3],
}

#[rustfmt::skip]
pub const TRIANGLE: [Vertex; 3] = [
    Vertex { color: [1.0, 0.01, 0.01, 0.0], position: [-5.0, 0.0, -4.0] },
    Vertex { color: [0.01, 1.0, 0.01, 0.0], position: [ 5.0, 0.0, -4.0] },
    Vertex { color: [0.01, 0.01, 1.0, 0.0], position: [ 0.0, 0.0,  6.0] },
];

/// Rotation of the triangle at the animation time `elapsed`.
pub fn rotation_degrees(elapsed: f64) -> f32 {
    (elapsed * DEGREES_PER_UNIT) as f32
}

/// Aspect ratio of the viewport, with a zero height treated as square.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

pub struct Renderer {
    gl: GlFunctions,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(gl: GlFunctions, width: u32, height: u32) -> Self {
        let mut renderer = Self { gl, width, height };
        renderer.resize(width, height);
        renderer
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        unsafe {
            self.gl.Viewport(0, 0, width as gl::types::GLsizei, height as gl::types::GLsizei);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Draw the frame at the animation time `elapsed`.
    pub fn draw(&self, elapsed: f64) {
        let aspect = aspect_ratio(self.width, self.height);
        let projection = math::perspective(FOV_Y, aspect, Z_NEAR, Z_FAR);

        unsafe {
            self.gl.ClearColor(0.0, 0.0, 0.0, 0.0);
            self.gl.Clear(gl::COLOR_BUFFER_BIT);

            self.gl.MatrixMode(gl::PROJECTION);
            self.gl.LoadIdentity();
            self.gl.LoadMatrixf(projection.as_ptr());

            self.gl.MatrixMode(gl::MODELVIEW);
            self.gl.LoadIdentity();
            // Look down onto the xz plane.
            self.gl.Rotatef(-90.0, 1.0, 0.0, 0.0);
            self.gl.Translatef(0.0, 0.0, -1.0);
            // Push the triangle away from the viewer, then spin it in place.
            self.gl.Translatef(0.0, 14.0, 0.0);
            self.gl.Rotatef(rotation_degrees(elapsed), 0.0, 0.0, 1.0);

            self.gl.Begin(gl::TRIANGLES);
            for vertex in &TRIANGLE {
                let [r, g, b, a] = vertex.color;
                let [x, y, z] = vertex.position;
                self.gl.Color4f(r, g, b, a);
                self.gl.Vertex3f(x, y, z);
            }
            self.gl.End();
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").field("width", &self.width).field("height", &self.height).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_follows_elapsed_time() {
        assert_eq!(rotation_degrees(0.0), 0.0);
        assert!((rotation_degrees(0.0166666) - 1.66666).abs() < 1e-5);
        assert!((rotation_degrees(3.6) - 360.0).abs() < 1e-4);
    }

    #[test]
    fn zero_height_is_square() {
        assert_eq!(aspect_ratio(800, 0), 1.0);
        assert_eq!(aspect_ratio(0, 0), 1.0);
        assert!((aspect_ratio(800, 480) - 5.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn triangle_has_one_dominant_channel_per_vertex() {
        for (index, vertex) in TRIANGLE.iter().enumerate() {
            assert_eq!(vertex.color[index], 1.0);
            assert_eq!(vertex.color[3], 0.0);
            // Every vertex lies in the xz plane.
            assert_eq!(vertex.position[1], 0.0);
        }
    }
}
