// Interleaved vertex layout: position (3), color (3), texcoord (2).
pub const FLOATS_PER_VERTEX: usize = 8;

pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Latitude/longitude sphere centered at the origin. Texcoords are
    /// equirectangular with v = 0 at the north pole.
    pub fn sphere(radius: f32, lat_segments: u16, lon_segments: u16, r: f32, g: f32, b: f32) -> Self {
        let mut vertices = Vec::with_capacity(
            (lat_segments as usize + 1) * (lon_segments as usize + 1) * FLOATS_PER_VERTEX,
        );
        let mut indices = Vec::with_capacity(lat_segments as usize * lon_segments as usize * 6);

        for lat in 0..=lat_segments {
            let v = lat as f32 / lat_segments as f32;
            let theta = v * std::f32::consts::PI;
            for lon in 0..=lon_segments {
                let u = lon as f32 / lon_segments as f32;
                let phi = u * 2.0 * std::f32::consts::PI;

                let x = theta.sin() * phi.cos();
                let y = theta.cos();
                let z = theta.sin() * phi.sin();
                vertices.extend_from_slice(&[x * radius, y * radius, z * radius, r, g, b, u, v]);
            }
        }

        let stride = lon_segments + 1;
        for lat in 0..lat_segments {
            for lon in 0..lon_segments {
                let a = lat * stride + lon;
                let b = a + stride;
                indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
            }
        }

        Mesh { vertices, indices }
    }

    /// Flat annulus in the xy plane, tilted at draw time.
    pub fn ring(inner_radius: f32, outer_radius: f32, segments: u16, r: f32, g: f32, b: f32) -> Self {
        let mut vertices = Vec::with_capacity((segments as usize + 1) * 2 * FLOATS_PER_VERTEX);
        let mut indices = Vec::with_capacity(segments as usize * 6);

        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let angle = u * 2.0 * std::f32::consts::PI;
            let (sin, cos) = angle.sin_cos();
            vertices.extend_from_slice(&[cos * inner_radius, sin * inner_radius, 0.0, r, g, b, u, 0.0]);
            vertices.extend_from_slice(&[cos * outer_radius, sin * outer_radius, 0.0, r, g, b, u, 1.0]);
        }

        for i in 0..segments {
            let a = i * 2;
            indices.extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
        }

        Mesh { vertices, indices }
    }

    /// Quad in the xy plane, centered at the origin, facing +z.
    /// Texcoord v = 0 along the top edge so raster-canvas textures read upright.
    pub fn quad(width: f32, height: f32) -> Self {
        let w = width / 2.0;
        let h = height / 2.0;
        let vertices = vec![
            -w, h, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0,
            -w, -h, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0,
            w, -h, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0,
            w, h, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0,
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Mesh { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts() {
        let mesh = Mesh::sphere(1.0, 16, 24, 1.0, 1.0, 1.0);
        assert_eq!(mesh.vertex_count(), 17 * 25);
        assert_eq!(mesh.indices.len(), 16 * 24 * 6);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = Mesh::sphere(5.0, 12, 12, 1.0, 1.0, 1.0);
        for chunk in mesh.vertices.chunks(FLOATS_PER_VERTEX) {
            let norm = (chunk[0] * chunk[0] + chunk[1] * chunk[1] + chunk[2] * chunk[2]).sqrt();
            assert!((norm - 5.0).abs() < 1e-3, "vertex off the sphere: {norm}");
        }
    }

    #[test]
    fn sphere_indices_in_range() {
        let mesh = Mesh::sphere(1.0, 32, 32, 1.0, 1.0, 1.0);
        let count = mesh.vertex_count() as u16;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn ring_stays_between_radii() {
        let mesh = Mesh::ring(2.0, 4.0, 48, 1.0, 0.6, 0.0);
        for chunk in mesh.vertices.chunks(FLOATS_PER_VERTEX) {
            let planar = (chunk[0] * chunk[0] + chunk[1] * chunk[1]).sqrt();
            assert!(planar > 2.0 - 1e-3 && planar < 4.0 + 1e-3);
            assert_eq!(chunk[2], 0.0);
        }
    }

    #[test]
    fn quad_dimensions() {
        let mesh = Mesh::quad(5.0, 1.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices.len(), 6);
        let xs: Vec<f32> = mesh.vertices.chunks(FLOATS_PER_VERTEX).map(|c| c[0]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 2.5);
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -2.5);
    }
}
