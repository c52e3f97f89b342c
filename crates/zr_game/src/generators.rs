use glam::Vec4;
use rand::Rng;

/// Half-width of the square around the player where nothing may spawn.
pub const EXCLUSION_HALF_EXTENT: f32 = 0.2;
/// Points are drawn from `[-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT]` on x and z.
pub const SPAWN_HALF_EXTENT: f32 = 2.0;
const MAX_SAMPLE_ATTEMPTS: u32 = 1000;

/// A random point on the ground plane outside the exclusion square at the origin.
pub fn generate_ground_point(rng: &mut impl Rng) -> Vec4 {
    let mut last = Vec4::new(0.0, 0.0, 0.0, 1.0);
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let x = rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        let z = rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        if x.abs() >= EXCLUSION_HALF_EXTENT || z.abs() >= EXCLUSION_HALF_EXTENT {
            return Vec4::new(x, 0.0, z, 1.0);
        }
        last = Vec4::new(x, 0.0, z, 1.0);
    }

    // Rejection probability is 1%, so reaching here means the RNG is broken.
    debug_assert!(
        false,
        "ground point rejection sampling exceeded {MAX_SAMPLE_ATTEMPTS} attempts"
    );
    log::warn!(
        "Ground point sampling exceeded {} attempts, pushing point to exclusion edge",
        MAX_SAMPLE_ATTEMPTS
    );
    let edge_x = if last.x < 0.0 {
        -EXCLUSION_HALF_EXTENT
    } else {
        EXCLUSION_HALF_EXTENT
    };
    Vec4::new(edge_x, 0.0, last.z, 1.0)
}

pub fn generate_ground_points(rng: &mut impl Rng, count: usize) -> Vec<Vec4> {
    (0..count).map(|_| generate_ground_point(rng)).collect()
}

/// Uniform sample in `[1 - amplitude, 1 + amplitude]`.
pub fn generate_speed_modifier(rng: &mut impl Rng, amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        return 1.0;
    }
    rng.gen_range((1.0 - amplitude)..=(1.0 + amplitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn ground_points_avoid_exclusion_square() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for point in generate_ground_points(&mut rng, 5000) {
            assert!(
                point.x.abs() >= EXCLUSION_HALF_EXTENT || point.z.abs() >= EXCLUSION_HALF_EXTENT,
                "point {point:?} inside exclusion square"
            );
            assert!(point.x.abs() <= SPAWN_HALF_EXTENT && point.z.abs() <= SPAWN_HALF_EXTENT);
            assert_eq!(point.y, 0.0);
            assert_eq!(point.w, 1.0);
        }
    }

    #[test]
    fn speed_modifier_stays_within_amplitude() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..5000 {
            let m = generate_speed_modifier(&mut rng, 0.2);
            assert!((0.8..=1.2).contains(&m), "modifier {m} out of range");
        }
    }

    #[test]
    fn zero_amplitude_is_exactly_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(generate_speed_modifier(&mut rng, 0.0), 1.0);
    }

    #[test]
    fn same_seed_same_points() {
        let a = generate_ground_points(&mut ChaCha8Rng::seed_from_u64(9), 16);
        let b = generate_ground_points(&mut ChaCha8Rng::seed_from_u64(9), 16);
        assert_eq!(a, b);
    }
}
