//! Tests for mixed strategy aggregation.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use blotto_cli::aggregate::expected_allocation;
use blotto_cli::config::Preset;
use blotto_cli::sampler::sample_pool;

#[test]
fn test_expected_allocation_preserves_budget() {
    let game = Preset::Extended.game().validate().unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let pool = sample_pool(game.defender_budget, &game.battlefields, 300, &mut rng).unwrap();

    // Uniform, heavily skewed and point-mass mixtures.
    let uniform = vec![1.0 / 300.0; 300];

    let raw: Vec<f64> = (0..300).map(|_| rng.gen::<f64>().powi(8)).collect();
    let total: f64 = raw.iter().sum();
    let skewed: Vec<f64> = raw.iter().map(|w| w / total).collect();

    let mut point = vec![0.0; 300];
    point[123] = 1.0;

    for strategy in [uniform, skewed, point] {
        let expected = expected_allocation(&pool, &strategy).unwrap();
        assert_eq!(expected.len(), game.battlefields.len());
        assert_abs_diff_eq!(
            expected.iter().sum::<f64>(),
            game.defender_budget as f64,
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_expected_allocation_respects_capacity() {
    let game = Preset::Extended.game().validate().unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let pool = sample_pool(game.attacker_budget, &game.battlefields, 50, &mut rng).unwrap();
    let strategy = vec![0.02; 50];

    let expected = expected_allocation(&pool, &strategy).unwrap();
    for (e, cap) in expected.iter().zip(game.battlefields.capacities()) {
        assert!(*e >= 0.0 && *e <= cap as f64 + 1e-9);
    }
}
