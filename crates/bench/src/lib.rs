use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 15;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1000;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// `count` distinct keys spread over a range four times wider, in random order.
pub fn distinct_keys<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<i64> {
    let span = (count as i64).max(1) * 4;
    let mut keys: Vec<i64> = (0..span).collect();
    keys.shuffle(rng);
    keys.truncate(count);
    keys
}

/// Random directed edges over vertices `0..vertices`, at most `max_out` leaving
/// each vertex. Duplicates are possible and exercise the overwrite path.
pub fn sparse_edges<R: Rng + ?Sized>(
    rng: &mut R,
    vertices: usize,
    max_out: usize,
) -> Vec<(i64, i64)> {
    let mut edges = Vec::with_capacity(vertices * max_out);
    if vertices == 0 {
        return edges;
    }
    for from in 0..vertices {
        for _ in 0..rng.random_range(0..=max_out) {
            let to = rng.random_range(0..vertices);
            edges.push((from as i64, to as i64));
        }
    }
    edges
}
