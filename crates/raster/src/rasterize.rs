//! Flat-shaded triangle rasterization into an RGBA8 texel buffer.
//!
//! Vertices arrive in clip space with `w = 1`, so the viewport transform is
//! the only step before coverage. Row 0 of the buffer is the top of the
//! surface. A pixel is covered when its center lies inside the triangle or
//! on one of its edges.

use glam::{Vec2, Vec3};

/// Maps a clip-space position to pixel coordinates (y pointing down).
pub fn clip_to_pixel(v: Vec3, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (v.x + 1.0) * 0.5 * width as f32,
        (1.0 - v.y) * 0.5 * height as f32,
    )
}

/// Signed double area of `(a, b, p)`; the sign tells which side of the
/// edge `a -> b` the point `p` is on.
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

/// Fills every triangle in `vertices` (taken three at a time) with `texel`.
///
/// Trailing vertices that do not form a whole triangle are ignored, as
/// are degenerate triangles. Both windings are accepted.
pub fn fill_triangles(
    texels: &mut [[u8; 4]],
    width: u32,
    height: u32,
    vertices: &[Vec3],
    texel: [u8; 4],
) {
    for tri in vertices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| clip_to_pixel(v, width, height));

        let area = edge(a, b, c);
        if area == 0.0 {
            continue;
        }

        let min = a.min(b).min(c).floor().max(Vec2::ZERO);
        let max = a
            .max(b)
            .max(c)
            .ceil()
            .min(Vec2::new(width as f32, height as f32));

        for y in min.y as u32..max.y as u32 {
            for x in min.x as u32..max.x as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w = [edge(b, c, p), edge(c, a, p), edge(a, b, p)];
                let inside = if area > 0.0 {
                    w.iter().all(|&e| e >= 0.0)
                } else {
                    w.iter().all(|&e| e <= 0.0)
                };
                if inside {
                    texels[y as usize * width as usize + x as usize] = texel;
                }
            }
        }
    }
}
