mod error;
mod join;
mod practice;
mod registry;
mod session;
mod streak;

pub use error::{JoinError, SessionError};
pub use join::JoinRequest;
pub use practice::{PracticeOutcome, PracticeSession};
pub use registry::GameRegistry;
pub use session::{format_clock, AnswerOutcome, CurrentQuestion, GameSession};
pub use streak::{MysteryBox, StreakTracker};

#[allow(non_snake_case)]
pub mod Constants {
    use ::std::ops::RangeInclusive;

    pub const POINTS_PER_CORRECT_ANSWER: u64 = 100;
    pub const MYSTERY_BOX_BONUS: u64 = 250;

    pub const MAX_TEAMS_PER_GAME: usize = 20;
    pub const MAX_TEAM_NAME_LENGTH: usize = 32;

    // Game codes are 7 digit numbers, never starting with 0
    pub const GAME_CODE_RANGE: RangeInclusive<u32> = 1_000_000..=9_999_999;
    pub const MAX_GAME_CODE_ATTEMPTS: usize = 32;

    pub const DEFAULT_GAME_LENGTH_MINUTES: u32 = 5;
    pub const PRACTICE_LENGTH_MINUTES: u32 = 5;

    pub const QUESTION_INTERVAL_SECS: u64 = 15;
    pub const GAME_REVEAL_DELAY_MS: u64 = 4000;
    pub const PRACTICE_REVEAL_DELAY_MS: u64 = 2000;

    // Correct answers in a row needed before a mystery box is offered
    pub const GAME_STREAK_REQUIREMENT: RangeInclusive<u32> = 2..=5;
    pub const PRACTICE_STREAK_REQUIREMENT: RangeInclusive<u32> = 1..=3;
}
