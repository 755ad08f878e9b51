//! Ray-sphere picking against the planet set.

use nalgebra::Point3;

use crate::engine::camera::Ray;

/// Nearest positive intersection distance of `ray` with a sphere, if any.
pub fn ray_sphere(ray: &Ray, center: Point3<f32>, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(&ray.dir);
    let c = oc.norm_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    if near > 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_d;
    if far > 0.0 {
        return Some(far);
    }
    None
}

/// Index of the target nearest along the ray. Equal distances resolve to the
/// lowest index.
pub fn pick_nearest(ray: &Ray, targets: &[(Point3<f32>, f32)]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &(center, radius)) in targets.iter().enumerate() {
        if let Some(distance) = ray_sphere(ray, center, radius) {
            let closer = match best {
                Some((_, best_distance)) => distance < best_distance,
                None => true,
            };
            if closer {
                best = Some((index, distance));
            }
        }
    }
    best.map(|(index, _)| index)
}

/// A hit replaces the current selection; a miss leaves it untouched.
/// Clearing happens only through an explicit close.
pub fn apply_pick(selected: &mut Option<String>, hit: Option<&str>) {
    if let Some(name) = hit {
        *selected = Some(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::camera::Camera;
    use crate::scene::planets::{planet_position, PLANETS};
    use nalgebra::Vector3;

    fn ray(origin: Point3<f32>, toward: Point3<f32>) -> Ray {
        Ray {
            origin,
            dir: (toward - origin).normalize(),
        }
    }

    #[test]
    fn miss_returns_none() {
        let r = Ray {
            origin: Point3::new(0.0, 50.0, 50.0),
            dir: Vector3::y(),
        };
        assert_eq!(ray_sphere(&r, Point3::new(10.0, 0.0, 0.0), 2.5), None);
    }

    #[test]
    fn sphere_behind_origin_is_not_hit() {
        let r = Ray {
            origin: Point3::origin(),
            dir: Vector3::z(),
        };
        assert_eq!(ray_sphere(&r, Point3::new(0.0, 0.0, -20.0), 1.0), None);
    }

    #[test]
    fn ray_from_inside_still_hits() {
        let r = Ray {
            origin: Point3::origin(),
            dir: Vector3::z(),
        };
        let distance = ray_sphere(&r, Point3::origin(), 3.0).unwrap();
        assert!((distance - 3.0).abs() < 1e-4);
    }

    #[test]
    fn direct_hit_distance() {
        let center = Point3::new(0.0, 0.0, -10.0);
        let r = ray(Point3::origin(), center);
        let distance = ray_sphere(&r, center, 2.0).unwrap();
        assert!((distance - 8.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_target_wins_regardless_of_order() {
        let r = Ray {
            origin: Point3::origin(),
            dir: -Vector3::z(),
        };
        let near = (Point3::new(0.0, 0.0, -10.0), 1.0);
        let far = (Point3::new(0.0, 0.0, -20.0), 1.0);
        assert_eq!(pick_nearest(&r, &[near, far]), Some(0));
        assert_eq!(pick_nearest(&r, &[far, near]), Some(1));
    }

    #[test]
    fn equal_distance_resolves_to_lowest_index() {
        let r = Ray {
            origin: Point3::origin(),
            dir: -Vector3::z(),
        };
        let sphere = (Point3::new(0.0, 0.0, -15.0), 2.0);
        assert_eq!(pick_nearest(&r, &[sphere, sphere]), Some(0));
    }

    #[test]
    fn empty_target_set_yields_nothing() {
        let r = Ray {
            origin: Point3::origin(),
            dir: -Vector3::z(),
        };
        assert_eq!(pick_nearest(&r, &[]), None);
    }

    #[test]
    fn screen_click_on_projected_planet_center_picks_it() {
        let width = 1280.0;
        let height = 720.0;
        let camera = Camera::new(width, height);
        let now_ms = 3_600_000.0;

        let targets: Vec<(Point3<f32>, f32)> = PLANETS
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let p = planet_position(spec, now_ms, i);
                (Point3::new(p[0], p[1], p[2]), spec.size)
            })
            .collect();

        // Project the Skills planet to the viewport, then click that pixel.
        let skills = 3;
        let ndc = camera.view_projection().transform_point(&targets[skills].0);
        let screen_x = (ndc.x + 1.0) / 2.0 * width;
        let screen_y = (1.0 - ndc.y) / 2.0 * height;

        let r = camera.screen_ray(screen_x, screen_y, width, height).unwrap();
        let picked = pick_nearest(&r, &targets).expect("expected a hit");
        assert_eq!(PLANETS[picked].name, "Skills");
    }

    #[test]
    fn click_far_outside_scene_selects_nothing() {
        let camera = Camera::new(1280.0, 720.0);
        let r = camera.screen_ray(2.0, 2.0, 1280.0, 720.0).unwrap();
        let targets: Vec<(Point3<f32>, f32)> = PLANETS
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let p = planet_position(spec, 0.0, i);
                (Point3::new(p[0], p[1], p[2]), spec.size)
            })
            .collect();
        assert_eq!(pick_nearest(&r, &targets), None);
    }

    #[test]
    fn selection_state_machine() {
        let mut selected: Option<String> = None;

        apply_pick(&mut selected, Some("Skills"));
        assert_eq!(selected.as_deref(), Some("Skills"));

        // A miss never clears the popup.
        apply_pick(&mut selected, None);
        assert_eq!(selected.as_deref(), Some("Skills"));

        selected = None; // explicit close
        assert_eq!(selected, None);

        apply_pick(&mut selected, Some("Contact"));
        assert_eq!(selected.as_deref(), Some("Contact"));

        // A new hit overrides without an intermediate close.
        apply_pick(&mut selected, Some("Education"));
        assert_eq!(selected.as_deref(), Some("Education"));
    }
}
