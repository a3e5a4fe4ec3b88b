use rand::Rng;

use super::checker;

pub fn gen_range_i32_inclusive<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> i32 {
    rng.gen_range(min..=max)
}

pub fn gen_range_f64<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.gen_range(min..max)
}

/// Uniform value in `[min, max)` kept to `places` decimal places.
pub fn gen_range_f64_rounded<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64, places: usize) -> f64 {
    checker::round_to_decimals(gen_range_f64(rng, min, max), places)
}

pub fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, choices: &[T]) -> Option<T> {
    if choices.is_empty() {
        return None;
    }
    Some(choices[rng.gen_range(0..choices.len())])
}

pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_bool(0.5)
}
