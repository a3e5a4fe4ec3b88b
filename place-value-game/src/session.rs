use ::std::collections::{BTreeMap, BTreeSet};
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use common_types::{
    Game::{GameState, PlayerRecord},
    Generate::{question_types_to_flags, QuestionType, QuestionTypeFlags},
};
use place_value_generate::{generate, Model::Question};

use crate::{
    Constants::{GAME_REVEAL_DELAY_MS, GAME_STREAK_REQUIREMENT, MAX_TEAMS_PER_GAME, POINTS_PER_CORRECT_ANSWER},
    JoinError, MysteryBox, SessionError, StreakTracker,
};

/// The question every team currently sees. `id` only ever grows.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentQuestion {
    pub id: i64,
    pub published_at: DateTime<Utc>,
    #[serde(flatten)]
    pub question: Question,
}

impl CurrentQuestion {
    /// Options stay hidden for the reveal delay after publishing.
    pub fn options_visible(&self, now: DateTime<Utc>) -> bool {
        now >= self.published_at + TimeDelta::milliseconds(GAME_REVEAL_DELAY_MS as i64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: f64,
    pub score: u64,
    pub mystery_box_earned: bool,
}

/// One hosted game, from the waiting room to the final leaderboard.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    game_code: String,
    game_length_minutes: u32,
    #[serde(serialize_with = "serialize_question_types")]
    question_types: BTreeSet<QuestionType>,
    players: BTreeMap<String, PlayerRecord>,
    game_state: GameState,
    created_at: DateTime<Utc>,
    game_start_time: Option<DateTime<Utc>>,
    current_question: Option<CurrentQuestion>,
    #[serde(skip)]
    streaks: BTreeMap<String, StreakTracker>,
    #[serde(skip)]
    last_answered: BTreeMap<String, i64>,
    #[serde(skip)]
    pending_boxes: BTreeMap<String, u32>,
}

fn serialize_question_types<S>(question_types: &BTreeSet<QuestionType>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let flags: QuestionTypeFlags = question_types_to_flags(question_types);
    flags.serialize(serializer)
}

impl GameSession {
    pub fn new(game_code: String, game_length_minutes: u32, question_types: BTreeSet<QuestionType>, now: DateTime<Utc>) -> Self {
        Self {
            game_code,
            game_length_minutes,
            question_types,
            players: BTreeMap::new(),
            game_state: GameState::Waiting,
            created_at: now,
            game_start_time: None,
            current_question: None,
            streaks: BTreeMap::new(),
            last_answered: BTreeMap::new(),
            pending_boxes: BTreeMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.game_code
    }
    pub fn state(&self) -> GameState {
        self.game_state
    }
    pub fn game_length_minutes(&self) -> u32 {
        self.game_length_minutes
    }
    pub fn question_types(&self) -> &BTreeSet<QuestionType> {
        &self.question_types
    }
    pub fn players(&self) -> &BTreeMap<String, PlayerRecord> {
        &self.players
    }
    pub fn player(&self, team_name: &str) -> Option<&PlayerRecord> {
        self.players.get(team_name)
    }
    pub fn current_question(&self) -> Option<&CurrentQuestion> {
        self.current_question.as_ref()
    }
    pub fn game_start_time(&self) -> Option<DateTime<Utc>> {
        self.game_start_time
    }

    /// Length and types can still change while teams are arriving.
    pub fn configure(&mut self, game_length_minutes: u32, question_types: BTreeSet<QuestionType>) -> Result<(), SessionError> {
        if self.game_state != GameState::Waiting {
            return Err(SessionError::NotWaiting(self.game_state));
        }
        self.game_length_minutes = game_length_minutes;
        self.question_types = question_types;
        Ok(())
    }

    pub fn join<R: Rng + ?Sized>(&mut self, rng: &mut R, team_name: &str) -> Result<(), JoinError> {
        if self.players.contains_key(team_name) {
            return Err(JoinError::TeamNameTaken);
        }
        if self.players.len() >= MAX_TEAMS_PER_GAME {
            return Err(JoinError::GameFull);
        }
        if self.game_state != GameState::Waiting {
            return Err(JoinError::AlreadyStarted);
        }
        self.players.insert(team_name.to_owned(), PlayerRecord::default());
        self.streaks.insert(team_name.to_owned(), StreakTracker::new(rng, GAME_STREAK_REQUIREMENT));
        tracing::info!(game_code = %self.game_code, team_name, teams = self.players.len(), "Team joined");
        Ok(())
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> Result<Option<&CurrentQuestion>, SessionError> {
        if self.game_state != GameState::Waiting {
            return Err(SessionError::NotWaiting(self.game_state));
        }
        if self.players.is_empty() {
            return Err(SessionError::NoTeams);
        }
        self.game_state = GameState::Running;
        self.game_start_time = Some(now);
        tracing::info!(game_code = %self.game_code, length_minutes = self.game_length_minutes, "Game started");
        Ok(self.next_question(rng, now))
    }

    /// Replaces the shared question. Returns `None` and leaves the board as is
    /// when the game is not running or no type is enabled.
    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> Option<&CurrentQuestion> {
        if self.game_state != GameState::Running {
            return None;
        }
        let question = generate(rng, &self.question_types)?;
        let id = match &self.current_question {
            Some(previous) => now.timestamp_millis().max(previous.id + 1),
            None => now.timestamp_millis(),
        };
        tracing::debug!(game_code = %self.game_code, id, problem = %question.problem, "Publishing question");
        self.current_question = Some(CurrentQuestion { id, published_at: now, question });
        self.current_question.as_ref()
    }

    /// Scores one answer. A completed streak leaves a mystery box pending
    /// for the team.
    pub fn submit_answer<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        team_name: &str,
        question_id: i64,
        selected: f64,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.game_state != GameState::Running {
            return Err(SessionError::NotRunning(self.game_state));
        }
        let current = self.current_question.as_ref().ok_or(SessionError::NoCurrentQuestion)?;
        if current.id != question_id {
            return Err(SessionError::StaleQuestion { current: current.id, got: question_id });
        }
        if !current.options_visible(now) {
            return Err(SessionError::OptionsHidden(current.id));
        }
        let record = self.players.get_mut(team_name).ok_or_else(|| SessionError::UnknownTeam(team_name.to_owned()))?;
        if self.last_answered.get(team_name) == Some(&question_id) {
            return Err(SessionError::AlreadyAnswered(team_name.to_owned()));
        }
        self.last_answered.insert(team_name.to_owned(), question_id);

        let correct = current.question.is_correct(selected);
        record.questions_answered += 1;
        if correct {
            record.score = record.score.saturating_add(POINTS_PER_CORRECT_ANSWER);
            record.questions_correct += 1;
        }
        let mystery_box_earned = self.streaks
            .entry(team_name.to_owned())
            .or_insert_with(|| StreakTracker::new(rng, GAME_STREAK_REQUIREMENT))
            .record(rng, correct);
        if mystery_box_earned {
            *self.pending_boxes.entry(team_name.to_owned()).or_insert(0) += 1;
        }

        Ok(AnswerOutcome {
            correct,
            correct_answer: current.question.answer,
            score: record.score,
            mystery_box_earned,
        })
    }

    pub fn pending_boxes(&self, team_name: &str) -> u32 {
        self.pending_boxes.get(team_name).copied().unwrap_or(0)
    }

    /// Opens one of the team's earned boxes, drawing its effect.
    pub fn apply_mystery_box<R: Rng + ?Sized>(&mut self, rng: &mut R, team_name: &str) -> Result<(MysteryBox, u64), SessionError> {
        let record = self.players.get_mut(team_name).ok_or_else(|| SessionError::UnknownTeam(team_name.to_owned()))?;
        let pending = self.pending_boxes.get_mut(team_name).filter(|pending| **pending > 0).ok_or(SessionError::NoMysteryBox)?;
        *pending -= 1;

        let mystery_box = MysteryBox::draw(rng);
        record.score = mystery_box.apply(record.score);
        tracing::info!(game_code = %self.game_code, team_name, effect = mystery_box.label(), score = record.score, "Mystery box opened");
        Ok((mystery_box, record.score))
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.game_start_time
            .map(|start| start + TimeDelta::minutes(i64::from(self.game_length_minutes)))
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.end_time().map(|end| (end - now).max(TimeDelta::zero()))
    }

    /// Finishes a running game once its length has elapsed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> GameState {
        if self.game_state == GameState::Running {
            if let Some(end) = self.end_time() {
                if now >= end {
                    self.finish();
                }
            }
        }
        self.game_state
    }

    pub fn finish(&mut self) {
        if self.game_state == GameState::Finished {
            return;
        }
        self.game_state = GameState::Finished;
        tracing::info!(game_code = %self.game_code, teams = self.players.len(), "Game finished");
    }

    /// Teams by score, highest first; ties keep name order.
    pub fn leaderboard(&self) -> Vec<(&str, &PlayerRecord)> {
        let mut standings: Vec<(&str, &PlayerRecord)> = self.players.iter()
            .map(|(name, record)| (name.as_str(), record))
            .collect();
        standings.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        standings
    }
}

/// `mm:ss` countdown text.
pub fn format_clock(remaining: TimeDelta) -> String {
    let seconds = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_types::Generate::STANDARD_QUESTION_TYPES;
    use rand::{rngs::StdRng, SeedableRng};

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + seconds, 0).unwrap()
    }

    fn session() -> GameSession {
        GameSession::new("1234567".to_owned(), 5, STANDARD_QUESTION_TYPES.iter().copied().collect(), at(0))
    }

    #[test]
    fn cannot_start_without_teams() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = session();
        assert_eq!(game.start(&mut rng, at(1)).unwrap_err(), SessionError::NoTeams);
    }

    #[test]
    fn join_rules() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        assert_eq!(game.join(&mut rng, "Owls"), Err(JoinError::TeamNameTaken));
        for i in 1..MAX_TEAMS_PER_GAME {
            game.join(&mut rng, &format!("Team {i}")).unwrap();
        }
        assert_eq!(game.join(&mut rng, "Latecomers"), Err(JoinError::GameFull));
    }

    #[test]
    fn no_joining_after_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        game.start(&mut rng, at(1)).unwrap();
        assert_eq!(game.join(&mut rng, "Foxes"), Err(JoinError::AlreadyStarted));
        assert!(game.configure(10, BTreeSet::new()).is_err());
    }

    #[test]
    fn question_ids_strictly_increase() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        let first = game.start(&mut rng, at(1)).unwrap().unwrap().id;
        let second = game.next_question(&mut rng, at(1)).unwrap().id;
        let third = game.next_question(&mut rng, at(0)).unwrap().id;
        assert!(first < second && second < third);
    }

    #[test]
    fn empty_type_set_withholds_questions() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = GameSession::new("1234567".to_owned(), 5, BTreeSet::new(), at(0));
        game.join(&mut rng, "Owls").unwrap();
        assert!(game.start(&mut rng, at(1)).unwrap().is_none());
        assert_eq!(game.state(), GameState::Running);
    }

    #[test]
    fn scoring_and_duplicate_answers() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        game.join(&mut rng, "Foxes").unwrap();
        let current = game.start(&mut rng, at(1)).unwrap().unwrap().clone();
        let wrong = *current.question.options.iter().find(|o| **o != current.question.answer).unwrap();

        let outcome = game.submit_answer(&mut rng, "Owls", current.id, current.question.answer, at(5)).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.score, 100);
        assert_eq!(
            game.submit_answer(&mut rng, "Owls", current.id, current.question.answer, at(6)),
            Err(SessionError::AlreadyAnswered("Owls".to_owned()))
        );

        let outcome = game.submit_answer(&mut rng, "Foxes", current.id, wrong, at(6)).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_answer, current.question.answer);

        let foxes = game.player("Foxes").unwrap();
        assert_eq!((foxes.score, foxes.questions_answered, foxes.questions_correct), (0, 1, 0));
        assert_eq!(game.leaderboard()[0].0, "Owls");
    }

    #[test]
    fn stale_answers_are_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        let old = game.start(&mut rng, at(1)).unwrap().unwrap().id;
        let new = game.next_question(&mut rng, at(16)).unwrap().id;
        assert_eq!(
            game.submit_answer(&mut rng, "Owls", old, 1.0, at(20)),
            Err(SessionError::StaleQuestion { current: new, got: old })
        );
    }

    #[test]
    fn tick_finishes_after_game_length() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        game.start(&mut rng, at(0)).unwrap();
        assert_eq!(game.tick(at(299)), GameState::Running);
        assert_eq!(format_clock(game.remaining(at(299)).unwrap()), "00:01");
        assert_eq!(game.tick(at(300)), GameState::Finished);
        assert!(game.next_question(&mut rng, at(301)).is_none());
        assert_eq!(format_clock(game.remaining(at(400)).unwrap()), "00:00");
    }

    #[test]
    fn options_reveal_after_delay() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        let current = game.start(&mut rng, at(10)).unwrap().unwrap().clone();
        assert!(!current.options_visible(at(13)));
        assert!(current.options_visible(at(14)));

        assert_eq!(
            game.submit_answer(&mut rng, "Owls", current.id, current.question.answer, at(11)),
            Err(SessionError::OptionsHidden(current.id))
        );
        assert_eq!(game.player("Owls").unwrap().questions_answered, 0);
        let outcome = game.submit_answer(&mut rng, "Owls", current.id, current.question.answer, at(14)).unwrap();
        assert!(outcome.correct);
    }

    #[test]
    fn unearned_mystery_box_is_refused() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        for _ in 0..3 {
            assert_eq!(game.apply_mystery_box(&mut rng, "Owls"), Err(SessionError::NoMysteryBox));
        }
        assert_eq!(game.player("Owls").unwrap().score, 0);
        assert_eq!(game.apply_mystery_box(&mut rng, "Bats"), Err(SessionError::UnknownTeam("Bats".to_owned())));
    }

    #[test]
    fn streak_earns_one_box() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = session();
        game.join(&mut rng, "Owls").unwrap();
        game.start(&mut rng, at(0)).unwrap();

        // the requirement is at most 5, so five straight correct answers earn a box
        let mut earned = 0;
        for round in 0..5 {
            let published = at(round * 15);
            if round > 0 {
                game.next_question(&mut rng, published);
            }
            let current = game.current_question().unwrap().clone();
            let outcome = game
                .submit_answer(&mut rng, "Owls", current.id, current.question.answer, published + TimeDelta::seconds(4))
                .unwrap();
            if outcome.mystery_box_earned {
                earned += 1;
            }
        }
        assert!(earned >= 1);
        assert_eq!(game.pending_boxes("Owls"), earned);

        let before = game.player("Owls").unwrap().score;
        let (mystery_box, score) = game.apply_mystery_box(&mut rng, "Owls").unwrap();
        assert_eq!(score, mystery_box.apply(before));
        assert_eq!(game.player("Owls").unwrap().score, score);
        assert_eq!(game.pending_boxes("Owls"), earned - 1);
    }

    #[test]
    fn document_uses_camel_case_and_flags() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = GameSession::new("1234567".to_owned(), 5, ["w_d_10".parse().unwrap()].into_iter().collect(), at(0));
        game.join(&mut rng, "Owls").unwrap();
        game.start(&mut rng, at(0)).unwrap();
        let document = serde_json::to_value(&game).unwrap();
        assert_eq!(document["gameCode"], "1234567");
        assert_eq!(document["gameState"], "running");
        assert_eq!(document["questionTypes"]["w_d_10"], true);
        assert_eq!(document["questionTypes"]["d1_d_10"], false);
        assert_eq!(document["players"]["Owls"]["questionsAnswered"], 0);
        assert!(document["currentQuestion"]["id"].is_i64());
        assert!(document["currentQuestion"]["problem"].is_string());
        assert!(document["currentQuestion"]["publishedAt"].is_string());
    }
}
