use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};

use super::{
    checker,
    engine::{
        MAX_DISTRACTOR_ATTEMPTS,
        OPTIONS_PER_QUESTION,
        PLACE_VALUE_MULTIPLIERS,
        POWER_OF_TEN_POOL,
        RESULT_PRECISION,
    },
};

/// Collects answer options, keeping them distinct and capped.
#[derive(Debug)]
pub struct OptionStacker {
    options: Vec<f64>,
    capacity: usize,
}
impl OptionStacker {
    pub fn new(correct: f64, capacity: usize) -> Self {
        let mut options = Vec::with_capacity(capacity);
        options.push(correct);
        Self { options, capacity }
    }
    pub fn push(&mut self, option: f64) -> bool {
        if self.is_full() || !checker::is_usable_option(option) || self.options.contains(&option) {
            return false;
        }
        self.options.push(option);
        true
    }
    pub fn is_full(&self) -> bool {
        self.options.len() >= self.capacity
    }
    pub fn len(&self) -> usize {
        self.options.len()
    }
    pub fn consume_shuffled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Vec<f64> {
        self.options.shuffle(rng);
        self.options
    }
}

/// Four distinct options holding `correct`, the rest off by a power of ten.
pub fn distract<R: Rng + ?Sized>(rng: &mut R, correct: f64, is_b_slot: bool) -> Vec<f64> {
    let mut stacker = OptionStacker::new(correct, OPTIONS_PER_QUESTION);

    if is_b_slot {
        let wanted = OPTIONS_PER_QUESTION - stacker.len();
        let candidates = POWER_OF_TEN_POOL.iter()
            .copied()
            .filter(|candidate| *candidate != correct)
            .choose_multiple(rng, wanted);
        for candidate in candidates {
            stacker.push(candidate);
        }
    } else {
        for multiplier in PLACE_VALUE_MULTIPLIERS {
            if stacker.is_full() {
                break;
            }
            stacker.push(checker::round_to_significant(correct * multiplier, RESULT_PRECISION));
        }
        // further right shifts, 1000x smaller and beyond
        let mut divisor = 1000.0;
        for _ in 0..MAX_DISTRACTOR_ATTEMPTS {
            if stacker.is_full() {
                break;
            }
            stacker.push(checker::round_to_significant(correct / divisor, RESULT_PRECISION));
            divisor *= 10.0;
        }
    }

    if !stacker.is_full() {
        tracing::warn!("Place value distractors collapsed for {correct}, using fallback options");
        fill_fallback(&mut stacker, correct);
    }

    stacker.consume_shuffled(rng)
}

// Offsets by powers of ten first, then small counting numbers. Each round of
// the counting loop either pushes or hits one of at most four held values.
fn fill_fallback(stacker: &mut OptionStacker, correct: f64) {
    for step in POWER_OF_TEN_POOL {
        if stacker.is_full() {
            return;
        }
        stacker.push(checker::round_to_significant(correct + step, RESULT_PRECISION));
    }
    let mut filler = 1.0;
    while !stacker.is_full() {
        stacker.push(filler);
        filler += 1.0;
    }
}
