//! The fixed triangle geometry uploaded once per context.
//!
//! Positions are given directly in clip space, so no projection is
//! involved: the apex sits at the top center of the surface and the base
//! spans its full width along the bottom edge.

use glam::Vec3;

/// Triangle vertices in clip space: top, bottom left, bottom right.
pub const TRIANGLE_VERTICES: [Vec3; 3] = [
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
];

/// Number of position components per vertex.
pub const COMPONENTS_PER_VERTEX: usize = 3;

/// Number of vertices issued by the draw call.
pub const VERTEX_COUNT: usize = TRIANGLE_VERTICES.len();

/// Flattens [`TRIANGLE_VERTICES`] into the tightly packed `x, y, z` layout
/// expected by vertex buffers.
pub fn vertex_data() -> [f32; VERTEX_COUNT * COMPONENTS_PER_VERTEX] {
    let mut data = [0.0; VERTEX_COUNT * COMPONENTS_PER_VERTEX];
    for (chunk, vertex) in data
        .chunks_exact_mut(COMPONENTS_PER_VERTEX)
        .zip(TRIANGLE_VERTICES.iter())
    {
        chunk.copy_from_slice(&vertex.to_array());
    }
    data
}
