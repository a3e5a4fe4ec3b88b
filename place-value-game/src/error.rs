use common_types::Game::GameState;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JoinError {
    #[error("invalid join request: {0}")]
    Invalid(String),
    #[error("Game not found. Check the code and try again.")]
    GameNotFound,
    #[error("This team name is already taken.")]
    TeamNameTaken,
    #[error("This game is full.")]
    GameFull,
    #[error("This game has already started.")]
    AlreadyStarted,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("game is {0}, expected it to be waiting")]
    NotWaiting(GameState),
    #[error("game is {0}, expected it to be running")]
    NotRunning(GameState),
    #[error("at least one team must join before the game starts")]
    NoTeams,
    #[error("team '{0}' is not part of this game")]
    UnknownTeam(String),
    #[error("no question is being shown")]
    NoCurrentQuestion,
    #[error("question {got} has been replaced by question {current}")]
    StaleQuestion { current: i64, got: i64 },
    #[error("team '{0}' already answered this question")]
    AlreadyAnswered(String),
    #[error("options for question {0} are not shown yet")]
    OptionsHidden(i64),
    #[error("no mystery box has been earned")]
    NoMysteryBox,
    #[error("option {0} is not on the board")]
    NoSuchOption(usize),
    #[error("no unused game code found after {0} attempts")]
    CodeSpaceExhausted(usize),
    #[error("the practice round is over")]
    PracticeOver,
}
