use ::std::ops::RangeInclusive;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Constants::MYSTERY_BOX_BONUS;

/// Counts correct answers in a row and says when a mystery box is due.
#[derive(Debug, Clone)]
pub struct StreakTracker {
    streak: u32,
    requirement: u32,
    requirement_range: RangeInclusive<u32>,
}

impl StreakTracker {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, requirement_range: RangeInclusive<u32>) -> Self {
        let requirement = rng.gen_range(requirement_range.clone());
        Self { streak: 0, requirement, requirement_range }
    }
    pub fn streak(&self) -> u32 {
        self.streak
    }
    pub fn requirement(&self) -> u32 {
        self.requirement
    }
    /// Returns true when this answer earns a box; the streak then restarts
    /// against a freshly drawn requirement.
    pub fn record<R: Rng + ?Sized>(&mut self, rng: &mut R, correct: bool) -> bool {
        if !correct {
            self.streak = 0;
            return false;
        }
        self.streak += 1;
        if self.streak < self.requirement {
            return false;
        }
        self.streak = 0;
        self.requirement = rng.gen_range(self.requirement_range.clone());
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum MysteryBox {
    Bonus,
    Double,
    Halve,
    Triple,
}

pub const MYSTERY_BOXES: [MysteryBox; 4] = [MysteryBox::Bonus, MysteryBox::Double, MysteryBox::Halve, MysteryBox::Triple];

impl MysteryBox {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        MYSTERY_BOXES[rng.gen_range(0..MYSTERY_BOXES.len())]
    }
    pub fn apply(&self, score: u64) -> u64 {
        match self {
            MysteryBox::Bonus => score.saturating_add(MYSTERY_BOX_BONUS),
            MysteryBox::Double => score.saturating_mul(2),
            // halves round up, 150 -> 75, 75 -> 38
            MysteryBox::Halve => score / 2 + score % 2,
            MysteryBox::Triple => score.saturating_mul(3),
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            MysteryBox::Bonus => "+250 Points!",
            MysteryBox::Double => "Score x2!",
            MysteryBox::Halve => "Score Halved :(",
            MysteryBox::Triple => "Score x3!!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn box_effects() {
        assert_eq!(MysteryBox::Bonus.apply(100), 350);
        assert_eq!(MysteryBox::Double.apply(100), 200);
        assert_eq!(MysteryBox::Triple.apply(100), 300);
        assert_eq!(MysteryBox::Halve.apply(150), 75);
        assert_eq!(MysteryBox::Halve.apply(75), 38);
        assert_eq!(MysteryBox::Halve.apply(0), 0);
        assert_eq!(MysteryBox::Triple.apply(u64::MAX), u64::MAX);
    }

    #[test]
    fn requirement_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut tracker = StreakTracker::new(&mut rng, 2..=5);
        for _ in 0..200 {
            assert!((2..=5).contains(&tracker.requirement()));
            tracker.record(&mut rng, true);
        }
    }

    #[test]
    fn box_is_earned_exactly_at_requirement() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut tracker = StreakTracker::new(&mut rng, 3..=3);
        assert!(!tracker.record(&mut rng, true));
        assert!(!tracker.record(&mut rng, true));
        assert!(tracker.record(&mut rng, true));
        assert_eq!(tracker.streak(), 0);
    }

    #[test]
    fn wrong_answer_resets_streak() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut tracker = StreakTracker::new(&mut rng, 2..=2);
        assert!(!tracker.record(&mut rng, true));
        assert!(!tracker.record(&mut rng, false));
        assert_eq!(tracker.streak(), 0);
        assert!(!tracker.record(&mut rng, true));
        assert!(tracker.record(&mut rng, true));
    }

    #[test]
    fn every_box_can_be_drawn() {
        let mut rng = StdRng::seed_from_u64(13);
        let drawn: Vec<MysteryBox> = (0..100).map(|_| MysteryBox::draw(&mut rng)).collect();
        for expected in MYSTERY_BOXES {
            assert!(drawn.contains(&expected));
        }
    }
}
