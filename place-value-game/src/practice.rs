use ::std::collections::BTreeSet;
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use common_types::Generate::{QuestionType, STANDARD_QUESTION_TYPES};
use place_value_generate::{generate, Model::Question};

use crate::{
    Constants::{POINTS_PER_CORRECT_ANSWER, PRACTICE_LENGTH_MINUTES, PRACTICE_STREAK_REQUIREMENT},
    MysteryBox, SessionError, StreakTracker,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeOutcome {
    pub correct: bool,
    pub correct_index: Option<usize>,
    pub score: u64,
    pub high_score: u64,
    pub mystery_box_earned: bool,
}

/// Single player drill against the clock with every standard type enabled.
/// The high score is carried between sessions by the caller.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    score: u64,
    high_score: u64,
    streak: StreakTracker,
    question_types: BTreeSet<QuestionType>,
    current: Option<Question>,
    pending_boxes: u32,
    ends_at: DateTime<Utc>,
}

impl PracticeSession {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, high_score: u64, now: DateTime<Utc>) -> Self {
        Self {
            score: 0,
            high_score,
            streak: StreakTracker::new(rng, PRACTICE_STREAK_REQUIREMENT),
            question_types: STANDARD_QUESTION_TYPES.iter().copied().collect(),
            current: None,
            pending_boxes: 0,
            ends_at: now + TimeDelta::minutes(i64::from(PRACTICE_LENGTH_MINUTES)),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }
    pub fn high_score(&self) -> u64 {
        self.high_score
    }
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }
    pub fn pending_boxes(&self) -> u32 {
        self.pending_boxes
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.ends_at - now).max(TimeDelta::zero())
    }

    pub fn is_over(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }

    /// `None` once the clock has run out.
    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> Option<&Question> {
        if self.is_over(now) {
            self.current = None;
            return None;
        }
        self.current = generate(rng, &self.question_types);
        self.current.as_ref()
    }

    /// Scores the option at `index` of the current question and clears it.
    pub fn answer<R: Rng + ?Sized>(&mut self, rng: &mut R, index: usize, now: DateTime<Utc>) -> Result<PracticeOutcome, SessionError> {
        if self.is_over(now) {
            return Err(SessionError::PracticeOver);
        }
        let question = self.current.as_ref().ok_or(SessionError::NoCurrentQuestion)?;
        let selected = *question.options.get(index).ok_or(SessionError::NoSuchOption(index))?;
        let correct = question.is_correct(selected);
        let correct_index = question.answer_index();
        self.current = None;

        if correct {
            self.score = self.score.saturating_add(POINTS_PER_CORRECT_ANSWER);
            self.raise_high_score();
        }
        let mystery_box_earned = self.streak.record(rng, correct);
        if mystery_box_earned {
            self.pending_boxes += 1;
        }
        Ok(PracticeOutcome {
            correct,
            correct_index,
            score: self.score,
            high_score: self.high_score,
            mystery_box_earned,
        })
    }

    pub fn open_mystery_box<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MysteryBox, SessionError> {
        if self.pending_boxes == 0 {
            return Err(SessionError::NoMysteryBox);
        }
        self.pending_boxes -= 1;
        let mystery_box = MysteryBox::draw(rng);
        self.score = mystery_box.apply(self.score);
        self.raise_high_score();
        tracing::info!(effect = mystery_box.label(), score = self.score, "Practice mystery box opened");
        Ok(mystery_box)
    }

    fn raise_high_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }
}
