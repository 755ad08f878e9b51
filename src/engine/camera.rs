use nalgebra::{Matrix4, Point3, Vector3};

pub const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 2000.0;

/// A ray in world space with a normalized direction.
pub struct Ray {
    pub origin: Point3<f32>,
    pub dir: Vector3<f32>,
}

pub struct Camera {
    distance: f32,
    elevation: f32,
    azimuth: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        // Start above and behind the sun, looking down at the orbit plane.
        Camera {
            distance: 70.71068,
            elevation: std::f32::consts::FRAC_PI_4,
            azimuth: 0.0,
            aspect: width / height,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn eye(&self) -> Point3<f32> {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        Point3::new(x, y, z)
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    pub fn projection(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, FOV_Y, NEAR_PLANE, FAR_PLANE)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection() * self.view()
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth += dx * 0.01;
        self.elevation += dy * 0.01;
        // Clamp elevation to avoid flipping
        self.elevation = self.elevation.max(-1.5).min(1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance += delta * 0.05;
        self.distance = self.distance.max(20.0).min(400.0);
    }

    /// Unproject a viewport-pixel coordinate into a world-space ray.
    pub fn screen_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Option<Ray> {
        let ndc_x = (x / width) * 2.0 - 1.0;
        let ndc_y = -(y / height) * 2.0 + 1.0;

        let inverse = self.view_projection().try_inverse()?;
        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));

        Some(Ray {
            origin: near,
            dir: (far - near).normalize(),
        })
    }

    /// Model matrix for a quad that always faces the camera.
    pub fn billboard_model(&self, pos: Point3<f32>, scale: f32) -> Matrix4<f32> {
        let toward = (self.eye() - pos).normalize();
        let right = Vector3::y().cross(&toward).normalize();
        let up = toward.cross(&right);
        Matrix4::new(
            right.x * scale, up.x * scale, toward.x, pos.x,
            right.y * scale, up.y * scale, toward.y, pos.y,
            right.z * scale, up.z * scale, toward.z, pos.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_viewport() {
        let mut cam = Camera::new(800.0, 600.0);
        assert!((cam.aspect() - 800.0 / 600.0).abs() < 1e-6);
        cam.set_viewport(1920.0, 1080.0);
        assert_eq!(cam.aspect(), 1920.0 / 1080.0);
    }

    #[test]
    fn initial_eye_above_orbit_plane() {
        let cam = Camera::new(800.0, 600.0);
        let eye = cam.eye();
        assert!(eye.x.abs() < 1e-3);
        assert!((eye.y - 50.0).abs() < 1e-2);
        assert!((eye.z - 50.0).abs() < 1e-2);
    }

    #[test]
    fn center_ray_points_at_origin() {
        let cam = Camera::new(1280.0, 720.0);
        let ray = cam.screen_ray(640.0, 360.0, 1280.0, 720.0).unwrap();
        let expected = (Point3::origin() - cam.eye()).normalize();
        assert!((ray.dir - expected).norm() < 1e-3);
    }

    #[test]
    fn ray_direction_is_normalized() {
        let cam = Camera::new(1280.0, 720.0);
        let ray = cam.screen_ray(100.0, 50.0, 1280.0, 720.0).unwrap();
        assert!((ray.dir.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn elevation_clamped_while_orbiting() {
        let mut cam = Camera::new(800.0, 600.0);
        cam.orbit(0.0, 1000.0);
        let eye = cam.eye();
        // Even at the clamp the eye never sits exactly on the y-axis.
        assert!(eye.z.abs() > 1e-3 || eye.x.abs() > 1e-3);
    }
}
