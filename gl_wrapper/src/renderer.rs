use crate::geometry::Geometry;
use crate::program::Program;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// Drawable area of the default framebuffer, anchored at the origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: i32,
    height: i32,
}

impl Viewport {
    /// `None` when either side is zero, as for a minimized window.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        Some(Self {
            width: i32::try_from(width).ok()?,
            height: i32::try_from(height).ok()?,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }

        unsafe {
            gl::BindVertexArray(geometry.vao());
            if geometry.is_indexed() {
                gl::DrawElements(
                    gl::TRIANGLES,
                    geometry.indices() as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                );
            } else {
                gl::DrawArrays(gl::TRIANGLES, 0, geometry.vertices() as i32);
            }
            gl::BindVertexArray(0);
        }
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        unsafe {
            gl::Viewport(0, 0, viewport.width, viewport.height);
        }
    }

    pub fn polygon_mode(&self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
        };

        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, mode);
        }
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
