use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const STAR_COUNT: usize = 1000;
pub const FIELD_HALF_EXTENT: f32 = 1000.0;

/// Fixed star positions with per-star opacity rewritten every frame.
/// Positions are generated once from a seed and never move.
pub struct StarField {
    pub positions: Vec<f32>,
    pub opacities: Vec<f32>,
}

impl StarField {
    pub fn generate(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(STAR_COUNT * 3);
        for _ in 0..STAR_COUNT * 3 {
            positions.push(rng.gen_range(-FIELD_HALF_EXTENT..FIELD_HALF_EXTENT));
        }
        StarField {
            positions,
            opacities: vec![1.0; STAR_COUNT],
        }
    }

    pub fn update_opacities(&mut self, now_ms: f64) {
        for (index, opacity) in self.opacities.iter_mut().enumerate() {
            *opacity = star_opacity(now_ms, index);
        }
    }
}

/// Smooth flicker with a period of about 2π seconds, phase-shifted per star.
pub fn star_opacity(now_ms: f64, index: usize) -> f32 {
    ((now_ms / 1000.0 + index as f64).sin()).abs() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_stays_in_unit_range() {
        for &t in &[0.0, 123.456, 1.0e9, -500.0, 1.7e12] {
            for j in 0..64 {
                let o = star_opacity(t, j);
                assert!((0.0..=1.0).contains(&o), "opacity {o} out of range at t={t}, j={j}");
            }
        }
    }

    #[test]
    fn opacity_is_continuous() {
        // One millisecond moves the phase by 1e-3, so |sin| moves by at most 1e-3.
        for step in 0..2000 {
            let t = step as f64 * 7.3;
            let diff = (star_opacity(t + 1.0, 11) - star_opacity(t, 11)).abs();
            assert!(diff < 2.0e-3, "jump of {diff} at t={t}");
        }
    }

    #[test]
    fn neighboring_stars_flicker_independently() {
        let t = 250.0;
        assert_ne!(star_opacity(t, 0), star_opacity(t, 1));
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = StarField::generate(42);
        let b = StarField::generate(42);
        assert_eq!(a.positions, b.positions);
        let c = StarField::generate(43);
        assert_ne!(a.positions, c.positions);
    }

    #[test]
    fn stars_fill_the_bounding_cube() {
        let field = StarField::generate(7);
        assert_eq!(field.positions.len(), STAR_COUNT * 3);
        assert_eq!(field.opacities.len(), STAR_COUNT);
        for &coordinate in &field.positions {
            assert!(coordinate.abs() <= FIELD_HALF_EXTENT);
        }
    }

    #[test]
    fn opacity_update_touches_every_star() {
        let mut field = StarField::generate(1);
        field.update_opacities(1234.0);
        for (j, &opacity) in field.opacities.iter().enumerate() {
            assert_eq!(opacity, star_opacity(1234.0, j));
        }
    }
}
