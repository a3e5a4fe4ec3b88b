// Entry point for the host and practice runners

use ::std::collections::BTreeSet;
use ::std::str;
use ::std::time::Duration;
use chrono::Utc;
use lazy_static::lazy_static;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use common_types::{
    Game::GameState,
    Generate::{str_to_question_types, QuestionType, STANDARD_QUESTION_TYPES},
};
use place_value_game::{
    format_clock,
    Constants::{
        DEFAULT_GAME_LENGTH_MINUTES, GAME_REVEAL_DELAY_MS, PRACTICE_REVEAL_DELAY_MS, QUESTION_INTERVAL_SECS,
    },
    GameRegistry, GameSession, JoinRequest, PracticeSession, SessionError,
};
use place_value_generate::format_number;

type E = Box<dyn ::std::error::Error + Send + Sync + 'static>;

enum Mode {
    Practice,
    Host,
}

impl str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "practice" => Ok(Mode::Practice),
            "host" => Ok(Mode::Host),
            _ => Err(format!("'{}' is not a valid PVS_MODE", s)),
        }
    }
}

// WARNING: These are read once on first use and never written to after
lazy_static!{
    static ref MODE: Mode = {
        dotenvy::var("PVS_MODE").unwrap_or("practice".to_owned()).parse().expect("Failed to parse PVS_MODE")
    };
    static ref QUESTION_TYPES: BTreeSet<QuestionType> = {
        match dotenvy::var("PVS_QUESTION_TYPES") {
            Ok(types) => str_to_question_types(types).expect("Failed to parse PVS_QUESTION_TYPES"),
            Err(_) => STANDARD_QUESTION_TYPES.iter().copied().collect(),
        }
    };
    static ref GAME_LENGTH_MINUTES: u32 = {
        dotenvy::var("PVS_GAME_LENGTH_MINUTES").unwrap_or(DEFAULT_GAME_LENGTH_MINUTES.to_string()).parse().expect("Failed to parse PVS_GAME_LENGTH_MINUTES")
    };
    static ref QUESTION_INTERVAL: Duration = {
        let secs: u64 = dotenvy::var("PVS_QUESTION_INTERVAL_SECS").unwrap_or(QUESTION_INTERVAL_SECS.to_string()).parse().expect("Failed to parse PVS_QUESTION_INTERVAL_SECS");
        Duration::from_secs(secs.max(1))
    };
    static ref TEAMS: Vec<String> = {
        dotenvy::var("PVS_TEAMS").unwrap_or_default()
            .split(',')
            .map(|team| team.trim().to_owned())
            .filter(|team| !team.is_empty())
            .collect()
    };
    static ref HIGH_SCORE: u64 = {
        dotenvy::var("PVS_HIGH_SCORE").unwrap_or("0".to_owned()).parse().expect("Failed to parse PVS_HIGH_SCORE")
    };
}

fn publish(game: &GameSession) -> Result<(), E> {
    println!("{}", serde_json::to_string(game)?);
    Ok(())
}

// Team answers arrive on stdin as `team,option`, option counted from 1
fn answer_from_line<R: Rng + ?Sized>(game: &mut GameSession, rng: &mut R, line: &str) {
    let Some((team, choice)) = line.split_once(',') else {
        tracing::warn!("Ignoring answer line '{line}', expected team,option");
        return;
    };
    let team = team.trim();
    let Some(current) = game.current_question() else {
        tracing::warn!("No question is showing, ignoring answer from {team}");
        return;
    };
    let question_id = current.id;
    let Some(selected) = choice.trim().parse::<usize>().ok()
        .and_then(|choice| choice.checked_sub(1))
        .and_then(|index| current.question.options.get(index).copied())
    else {
        tracing::warn!("Team {team} picked '{}', which is not an option", choice.trim());
        return;
    };

    match game.submit_answer(rng, team, question_id, selected, Utc::now()) {
        Ok(outcome) => {
            tracing::info!(team, correct = outcome.correct, score = outcome.score, "Answer received");
            if outcome.mystery_box_earned {
                match game.apply_mystery_box(rng, team) {
                    Ok((mystery_box, score)) => tracing::info!(team, effect = mystery_box.label(), score, "Mystery box opened"),
                    Err(err) => tracing::warn!("Mystery box for {team} failed: {err}"),
                }
            }
        },
        Err(err) => tracing::warn!("Answer from {team} rejected: {err}"),
    }
}

#[tracing::instrument(skip_all, fields(game_code))]
async fn run_host() -> Result<(), E> {
    let mut rng = rand::thread_rng();
    let mut registry = GameRegistry::new();

    let code = registry
        .create_game(&mut rng, *GAME_LENGTH_MINUTES, QUESTION_TYPES.clone(), Utc::now())?
        .code()
        .to_owned();
    tracing::Span::current().record("game_code", code.as_str());

    for team in TEAMS.iter() {
        if let Err(err) = registry.join(&mut rng, JoinRequest::new(code.as_str(), team.as_str())) {
            tracing::warn!("Team {team} could not join: {err}");
        }
    }

    let game = registry.get_mut(&code).ok_or("game vanished from registry")?;
    game.start(&mut rng, Utc::now())?;
    publish(game)?;

    let reveal_delay = Duration::from_millis(GAME_REVEAL_DELAY_MS);
    let reveal = tokio::time::sleep(reveal_delay);
    tokio::pin!(reveal);
    let mut hidden = game.current_question().is_some();

    let mut rotation = tokio::time::interval(*QUESTION_INTERVAL);
    rotation.tick().await;
    let mut clock = tokio::time::interval(Duration::from_secs(1));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reading = true;

    loop {
        tokio::select! {
            _ = rotation.tick() => {
                if game.next_question(&mut rng, Utc::now()).is_some() {
                    publish(game)?;
                    reveal.as_mut().reset(tokio::time::Instant::now() + reveal_delay);
                    hidden = true;
                }
            },
            _ = &mut reveal, if hidden => {
                hidden = false;
                if let Some(current) = game.current_question() {
                    tracing::info!(id = current.id, "Options revealed, answers open");
                }
            },
            line = lines.next_line(), if reading => {
                match line? {
                    Some(line) if !line.trim().is_empty() => answer_from_line(game, &mut rng, &line),
                    Some(_) => {},
                    None => reading = false,
                }
            },
            _ = clock.tick() => {
                let now = Utc::now();
                if game.tick(now) == GameState::Finished {
                    break;
                }
                if let Some(remaining) = game.remaining(now) {
                    tracing::debug!(clock = %format_clock(remaining));
                }
            },
        }
    }

    publish(game)?;
    for (place, (team, record)) in game.leaderboard().into_iter().enumerate() {
        tracing::info!(
            place = place + 1,
            team = %team,
            score = record.score,
            correct = record.questions_correct,
            answered = record.questions_answered,
            accuracy = record.accuracy_percent(),
            "Final standing"
        );
    }
    Ok(())
}

async fn run_practice() -> Result<(), E> {
    let mut rng = rand::thread_rng();
    let mut practice = PracticeSession::new(&mut rng, *HIGH_SCORE, Utc::now());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let deadline = tokio::time::sleep(practice.remaining(Utc::now()).to_std().unwrap_or_default());
    tokio::pin!(deadline);

    'game: loop {
        let Some(question) = practice.next_question(&mut rng, Utc::now()).cloned() else {
            break;
        };
        println!("[{}] Score: {}  {}", format_clock(practice.remaining(Utc::now())), practice.score(), question.problem);

        tokio::select! {
            _ = &mut deadline => break 'game,
            _ = tokio::time::sleep(Duration::from_millis(PRACTICE_REVEAL_DELAY_MS)) => {},
        }
        for (index, option) in question.options.iter().enumerate() {
            println!("  {}) {}", index + 1, format_number(*option));
        }

        let outcome = loop {
            let line = tokio::select! {
                _ = &mut deadline => break 'game,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                break 'game;
            };
            let Some(index) = line.trim().parse::<usize>().ok().and_then(|choice| choice.checked_sub(1)) else {
                println!("Pick an option from 1 to {}", question.options.len());
                continue;
            };
            match practice.answer(&mut rng, index, Utc::now()) {
                Ok(outcome) => break outcome,
                Err(SessionError::PracticeOver) => break 'game,
                Err(SessionError::NoSuchOption(_)) => println!("Pick an option from 1 to {}", question.options.len()),
                Err(err) => return Err(err.into()),
            }
        };

        if outcome.correct {
            println!("Correct!");
        } else {
            let shown = outcome.correct_index
                .map(|index| format!("{}) {}", index + 1, format_number(question.options[index])))
                .unwrap_or_else(|| format_number(question.answer));
            println!("Not quite, the answer was {shown}");
        }
        if outcome.mystery_box_earned {
            let mystery_box = practice.open_mystery_box(&mut rng)?;
            println!("Mystery box! {}  Score: {}", mystery_box.label(), practice.score());
        }
    }

    println!("Final Score: {}", practice.score());
    println!("High Score: {}", practice.high_score());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), E> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .with_writer(::std::io::stderr)
        .init();

    tracing::info!(types = QUESTION_TYPES.len(), "Starting");
    match *MODE {
        Mode::Host => run_host().await,
        Mode::Practice => run_practice().await,
    }
}
