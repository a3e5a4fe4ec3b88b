use ::std::collections::{BTreeSet, HashMap};
use chrono::{DateTime, Utc};
use rand::Rng;
use common_types::Generate::QuestionType;

use crate::{
    Constants::{GAME_CODE_RANGE, MAX_GAME_CODE_ATTEMPTS},
    GameSession, JoinError, JoinRequest, SessionError,
};

/// Live games keyed by their 7 digit code.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: HashMap<String, GameSession>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws codes until an unused one turns up, giving up after a bounded
    /// number of collisions.
    pub fn create_game<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        game_length_minutes: u32,
        question_types: BTreeSet<QuestionType>,
        now: DateTime<Utc>,
    ) -> Result<&mut GameSession, SessionError> {
        for _ in 0..MAX_GAME_CODE_ATTEMPTS {
            let code = rng.gen_range(GAME_CODE_RANGE).to_string();
            if self.games.contains_key(&code) {
                tracing::warn!("Code {code} exists. Generating a new one.");
                continue;
            }
            tracing::info!(game_code = %code, game_length_minutes, "Created game");
            let session = GameSession::new(code.clone(), game_length_minutes, question_types, now);
            return Ok(self.games.entry(code).or_insert(session));
        }
        Err(SessionError::CodeSpaceExhausted(MAX_GAME_CODE_ATTEMPTS))
    }

    pub fn get(&self, code: &str) -> Option<&GameSession> {
        self.games.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut GameSession> {
        self.games.get_mut(code)
    }

    pub fn remove(&mut self, code: &str) -> Option<GameSession> {
        self.games.remove(code)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    #[tracing::instrument(skip(self, rng, request), fields(game_code = %request.game_code, team_name = %request.team_name))]
    pub fn join<R: Rng + ?Sized>(&mut self, rng: &mut R, request: JoinRequest) -> Result<&GameSession, JoinError> {
        let request = request.validated()?;
        let session = self.games.get_mut(&request.game_code).ok_or(JoinError::GameNotFound)?;
        session.join(rng, &request.team_name)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn codes_are_seven_digits_and_unique() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut registry = GameRegistry::new();
        let mut codes = BTreeSet::new();
        for _ in 0..50 {
            let code = registry.create_game(&mut rng, 5, BTreeSet::new(), Utc::now()).unwrap().code().to_owned();
            assert_eq!(code.len(), 7);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            codes.insert(code);
        }
        assert_eq!(codes.len(), 50);
        assert_eq!(registry.len(), 50);
    }

    #[test]
    fn join_reports_missing_game() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut registry = GameRegistry::new();
        let err = registry.join(&mut rng, JoinRequest::new("1111111", "Owls")).unwrap_err();
        assert_eq!(err, JoinError::GameNotFound);
    }
}
