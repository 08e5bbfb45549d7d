//! Randomized checks of global hypothesis pool maintenance

mod common;

use common::{frontier_snapshot, make_root_1d};
use pmbm::filters::density::GaussianDensity;
use pmbm::filters::pmbm::{GlobalHypothesis, MultiBernoulliMixture};
use pmbm::models::PositionSensor1D;
use pmbm::types::ids::TrackId;
use pmbm::types::spaces::Measurement;
use pmbm::utils::log_sum_exp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_pool(rng: &mut StdRng, size: usize) -> Vec<GlobalHypothesis<f64>> {
    (0..size)
        .map(|_| GlobalHypothesis::new(rng.gen_range(-30.0..5.0), std::iter::empty()).unwrap())
        .collect()
}

fn log_weights(mbm: &MultiBernoulliMixture<f64, 1>) -> Vec<f64> {
    mbm.global_hypotheses().iter().map(|gh| gh.log_weight()).collect()
}

#[test]
fn test_normalization_sums_to_one() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..50 {
        let size = rng.gen_range(1..40);
        let mut mbm = MultiBernoulliMixture::<f64, 1>::new();
        mbm.set_global_hypotheses(random_pool(&mut rng, size)).unwrap();

        mbm.normalize_global_hypotheses_weights();
        assert!(log_sum_exp(&log_weights(&mbm)).abs() < 1e-9);
    }
}

#[test]
fn test_prune_removes_everything_at_or_below_threshold() {
    let mut rng = StdRng::seed_from_u64(23);

    for _ in 0..50 {
        let size = rng.gen_range(1..40);
        let pool = random_pool(&mut rng, size);
        let threshold = rng.gen_range(-20.0..0.0);
        let survivors = pool.iter().filter(|gh| gh.log_weight() > threshold).count();

        let mut mbm = MultiBernoulliMixture::<f64, 1>::new();
        mbm.set_global_hypotheses(pool).unwrap();
        mbm.prune_global_hypotheses(threshold);

        assert_eq!(mbm.global_hypotheses().len(), survivors);
        if survivors > 0 {
            let linear: f64 = log_weights(&mbm).iter().map(|w| w.exp()).sum();
            assert!((linear - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_cap_keeps_n_highest() {
    let mut rng = StdRng::seed_from_u64(37);

    for _ in 0..50 {
        let size = rng.gen_range(0..40);
        let max_count = rng.gen_range(0..45);
        let pool = random_pool(&mut rng, size);

        let mut expected: Vec<f64> = pool.iter().map(|gh| gh.log_weight()).collect();
        expected.sort_by(|a, b| b.partial_cmp(a).unwrap());
        expected.truncate(max_count);

        let mut mbm = MultiBernoulliMixture::<f64, 1>::new();
        mbm.set_global_hypotheses(pool).unwrap();
        mbm.cap_global_hypothesis(max_count);

        let kept = log_weights(&mbm);
        assert!(kept.len() <= max_count);
        assert_eq!(kept.len(), expected.len());

        if size > max_count && max_count > 0 {
            // Renormalized: compare after removing the common shift
            let shift = log_sum_exp(&expected);
            for (k, e) in kept.iter().zip(&expected) {
                assert!((k - (e - shift)).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_garbage_collection_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(53);
    let sensor = PositionSensor1D::new(1.0);

    for _ in 0..20 {
        let mut mbm = MultiBernoulliMixture::<f64, 1>::new();
        let num_tracks = rng.gen_range(1..6);
        for i in 0..num_tracks {
            mbm.create_track(make_root_1d(rng.gen_range(0.1..0.99), i as f64 * 10.0))
                .unwrap();
        }

        let z: Vec<Measurement<f64, 1>> = (0..rng.gen_range(0..4))
            .map(|_| Measurement::from_array([rng.gen_range(-5.0..45.0)]))
            .collect();
        mbm.update(0.9, &z, &sensor, &GaussianDensity).unwrap();
        mbm.advance_frontiers();

        // Random pool over random subsets of tracks
        let mut pool = Vec::new();
        for _ in 0..rng.gen_range(0..5) {
            let mut pairs = Vec::new();
            for (track_id, track) in mbm.tracks() {
                if rng.gen_bool(0.6) {
                    let ids: Vec<_> = track.frontier().keys().copied().collect();
                    pairs.push((*track_id, ids[rng.gen_range(0..ids.len())]));
                }
            }
            pool.push(GlobalHypothesis::new(rng.gen_range(-5.0..0.0), pairs).unwrap());
        }
        mbm.set_global_hypotheses(pool).unwrap();

        mbm.prune_tree().unwrap();
        mbm.remove_unused_tracks();
        mbm.remove_unused_bernoullies();
        let once = frontier_snapshot(&mbm);

        mbm.prune_tree().unwrap();
        mbm.remove_unused_tracks();
        mbm.remove_unused_bernoullies();
        assert_eq!(frontier_snapshot(&mbm), once);

        // Everything left is referenced
        let used = mbm.used_associations();
        let tracks: Vec<TrackId> = mbm.tracks().keys().copied().collect();
        assert_eq!(tracks, used.keys().copied().collect::<Vec<_>>());
        for (track_id, ids) in &used {
            let frontier: Vec<_> = mbm.track(*track_id).unwrap().frontier().keys().copied().collect();
            assert_eq!(frontier, ids.iter().copied().collect::<Vec<_>>());
        }
    }
}
