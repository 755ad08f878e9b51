//! Portfolio planet definitions and orbital motion. Pure math, no GL.

/// Orbital rate in radians per millisecond per index step.
pub const ORBIT_RATE: f64 = 5.0e-6;
/// Sun self-rotation in radians per millisecond.
pub const SUN_SPIN_RATE: f64 = 3.0e-5;
/// Labels float this far above a planet's surface.
pub const LABEL_ALTITUDE: f32 = 0.5;

const TAU: f64 = std::f64::consts::TAU;

pub struct PlanetSpec {
    pub name: &'static str,
    pub texture_url: &'static str,
    pub distance: f32,
    pub size: f32,
    pub ring: bool,
}

pub static PLANETS: [PlanetSpec; 8] = [
    PlanetSpec { name: "Profile", texture_url: "/mercury.jpg", distance: 10.0, size: 2.5, ring: false },
    PlanetSpec { name: "Contact", texture_url: "/jupiter.jpg", distance: 15.0, size: 4.0, ring: false },
    PlanetSpec { name: "AboutMe", texture_url: "/earth.jpg", distance: 20.0, size: 3.0, ring: false },
    PlanetSpec { name: "Skills", texture_url: "/mars.jpg", distance: 25.0, size: 2.5, ring: false },
    PlanetSpec { name: "Achievements", texture_url: "/venus.jpg", distance: 30.0, size: 3.0, ring: false },
    PlanetSpec { name: "Experience", texture_url: "/neptune.jpg", distance: 35.0, size: 3.0, ring: false },
    PlanetSpec { name: "Education", texture_url: "/saturn.jpg", distance: 40.0, size: 3.5, ring: true },
    PlanetSpec { name: "Introduction", texture_url: "/uranus.jpg", distance: 45.0, size: 2.5, ring: false },
];

/// Angle of planet `index` at `now_ms`. A pure function of the timestamp, so
/// the animation has no drift and can be replayed from any clock value.
/// Reduced mod 2π in f64 before narrowing, since epoch timestamps are large.
pub fn orbital_angle(now_ms: f64, index: usize) -> f32 {
    let angle = now_ms * ORBIT_RATE * (index as f64 + 1.0);
    (angle.rem_euclid(TAU)) as f32
}

/// Planet position on the orbit plane at `now_ms`.
pub fn planet_position(spec: &PlanetSpec, now_ms: f64, index: usize) -> [f32; 3] {
    let angle = orbital_angle(now_ms, index);
    [spec.distance * angle.cos(), 0.0, spec.distance * angle.sin()]
}

/// Labels counter-rotate against the orbit so the text stays legible.
pub fn label_rotation(now_ms: f64, index: usize) -> f32 {
    -orbital_angle(now_ms, index)
}

pub fn sun_angle(now_ms: f64) -> f32 {
    (now_ms * SUN_SPIN_RATE).rem_euclid(TAU) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_a_pure_function_of_time() {
        let spec = &PLANETS[3];
        let first = planet_position(spec, 123456789.0, 3);
        let _other = planet_position(spec, 999999999.0, 3);
        let again = planet_position(spec, 123456789.0, 3);
        assert_eq!(first, again);
    }

    #[test]
    fn all_planets_start_on_positive_x_axis() {
        for (i, spec) in PLANETS.iter().enumerate() {
            let pos = planet_position(spec, 0.0, i);
            assert_eq!(pos, [spec.distance, 0.0, 0.0]);
        }
    }

    #[test]
    fn two_planet_reference_layout() {
        let near = PlanetSpec { name: "near", texture_url: "", distance: 10.0, size: 1.0, ring: false };
        let far = PlanetSpec { name: "far", texture_url: "", distance: 20.0, size: 1.0, ring: false };
        assert_eq!(planet_position(&near, 0.0, 0), [10.0, 0.0, 0.0]);
        assert_eq!(planet_position(&far, 0.0, 1), [20.0, 0.0, 0.0]);
    }

    #[test]
    fn angle_scales_with_index() {
        let t = 1000.0;
        let inner = orbital_angle(t, 0);
        let outer = orbital_angle(t, 1);
        assert!((outer - 2.0 * inner).abs() < 1e-6);
    }

    #[test]
    fn angle_stays_reduced_for_epoch_timestamps() {
        // Milliseconds since the Unix epoch, as the browser clock reports.
        let t = 1.7e12;
        for i in 0..PLANETS.len() {
            let angle = orbital_angle(t, i);
            assert!(angle >= 0.0 && angle < std::f32::consts::TAU + 1e-4);
        }
    }

    #[test]
    fn label_counter_rotates() {
        let t = 987654.0;
        assert_eq!(label_rotation(t, 4), -orbital_angle(t, 4));
    }

    #[test]
    fn orbit_radii_distinct_and_increasing() {
        for pair in PLANETS.windows(2) {
            assert!(pair[0].distance < pair[1].distance);
        }
    }

    #[test]
    fn exactly_one_ringed_planet() {
        assert_eq!(PLANETS.iter().filter(|spec| spec.ring).count(), 1);
        assert!(PLANETS.iter().find(|spec| spec.ring).unwrap().name == "Education");
    }
}
