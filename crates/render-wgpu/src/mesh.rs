use bytemuck::{Pod, Zeroable};

/// Subdivisions per side of the shared plane. The vertex shader bends the
/// plane, so it needs enough vertices to curve smoothly.
pub const PLANE_SEGMENTS: u32 = 100;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Unit plane centred on the origin in the XY plane, `segments_x` by
/// `segments_y` quads. `uv.y` is 1 along the top edge.
pub fn plane_mesh(segments_x: u32, segments_y: u32) -> (Vec<PlaneVertex>, Vec<u16>) {
    let sx = segments_x.max(1);
    let sy = segments_y.max(1);
    let row = sx + 1;

    let mut vertices = Vec::with_capacity((row * (sy + 1)) as usize);
    for iy in 0..=sy {
        let v = iy as f32 / sy as f32;
        for ix in 0..=sx {
            let u = ix as f32 / sx as f32;
            vertices.push(PlaneVertex {
                position: [u - 0.5, 0.5 - v, 0.0],
                uv: [u, 1.0 - v],
            });
        }
    }

    let mut indices = Vec::with_capacity((sx * sy * 6) as usize);
    for iy in 0..sy {
        for ix in 0..sx {
            let a = (ix + row * iy) as u16;
            let b = (ix + row * (iy + 1)) as u16;
            let c = (ix + 1 + row * (iy + 1)) as u16;
            let d = (ix + 1 + row * iy) as u16;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_segments() {
        let (verts, indices) = plane_mesh(4, 2);
        assert_eq!(verts.len(), 5 * 3);
        assert_eq!(indices.len(), 4 * 2 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
    }

    #[test]
    fn full_plane_fits_u16_indices() {
        let (verts, indices) = plane_mesh(PLANE_SEGMENTS, PLANE_SEGMENTS);
        assert_eq!(verts.len(), 101 * 101);
        assert_eq!(*indices.iter().max().unwrap() as usize, verts.len() - 1);
    }

    #[test]
    fn corners_and_uvs() {
        let (verts, _) = plane_mesh(1, 1);
        assert_eq!(verts[0].position, [-0.5, 0.5, 0.0]);
        assert_eq!(verts[0].uv, [0.0, 1.0]);
        assert_eq!(verts[3].position, [0.5, -0.5, 0.0]);
        assert_eq!(verts[3].uv, [1.0, 0.0]);
    }
}
