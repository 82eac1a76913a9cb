use std::ffi::CStr;

/// Corners of the demo quad, one `vec3` per vertex.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; 12] = [
    0.5, 0.5, 0.0,   // top right
    0.5, -0.5, 0.0,  // bottom right
    -0.5, -0.5, 0.0, // bottom left
    -0.5, 0.5, 0.0,  // top left
];

/// Two triangles sharing the top right - bottom left diagonal.
#[rustfmt::skip]
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

pub mod geometry;
pub mod program;
pub mod renderer;

/// Version string of the current context, if one is current and loaded.
pub fn version_string() -> Option<String> {
    if !gl::GetString::is_loaded() {
        return None;
    }

    unsafe {
        let ptr = gl::GetString(gl::VERSION);
        if ptr.is_null() {
            return None;
        }

        Some(CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(i: u32) -> (f32, f32) {
        let i = i as usize * 3;
        (QUAD_VERTICES[i], QUAD_VERTICES[i + 1])
    }

    fn signed_area(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
        ((b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1)) / 2.0
    }

    fn side(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
        (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
    }

    #[test]
    fn indices_form_two_triangles() {
        assert_eq!(QUAD_INDICES.len() % 3, 0);
        assert_eq!(QUAD_INDICES.len() / 3, 2);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len() / 3));
    }

    #[test]
    fn triangles_cover_quad() {
        let quad_area = {
            let xs = QUAD_VERTICES.iter().step_by(3);
            let ys = QUAD_VERTICES.iter().skip(1).step_by(3);
            let (min_x, max_x) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), &x| (lo.min(x), hi.max(x)));
            let (min_y, max_y) = ys.fold((f32::MAX, f32::MIN), |(lo, hi), &y| (lo.min(y), hi.max(y)));
            (max_x - min_x) * (max_y - min_y)
        };

        let covered: f32 = QUAD_INDICES
            .chunks(3)
            .map(|t| signed_area(vertex(t[0]), vertex(t[1]), vertex(t[2])).abs())
            .sum();

        assert_eq!(quad_area, 1.0);
        assert!((covered - quad_area).abs() < f32::EPSILON);
    }

    #[test]
    fn triangles_do_not_overlap() {
        let first = &QUAD_INDICES[0..3];
        let second = &QUAD_INDICES[3..6];

        let shared: Vec<u32> = first.iter().copied().filter(|i| second.contains(i)).collect();
        assert_eq!(shared, vec![1, 3]);

        let own_first = first.iter().copied().find(|i| !shared.contains(i)).unwrap();
        let own_second = second.iter().copied().find(|i| !shared.contains(i)).unwrap();

        // opposite sides of the shared edge
        let a = side(vertex(shared[0]), vertex(shared[1]), vertex(own_first));
        let b = side(vertex(shared[0]), vertex(shared[1]), vertex(own_second));
        assert!(a * b < 0.0);
    }

    #[test]
    fn triangles_share_winding() {
        let windings: Vec<bool> = QUAD_INDICES
            .chunks(3)
            .map(|t| signed_area(vertex(t[0]), vertex(t[1]), vertex(t[2])) > 0.0)
            .collect();

        assert_eq!(windings[0], windings[1]);
    }
}
