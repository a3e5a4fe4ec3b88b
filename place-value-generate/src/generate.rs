use ::std::collections::BTreeSet;
use rand::Rng;
use rand::seq::IteratorRandom;
use common_types::Generate::{enabled_question_types, QuestionType, QuestionTypeFlags};

pub mod engine;
pub mod question;
mod checker;
mod formatter;
mod helper;
mod optionstacker;

use engine::{GenerateFailure, GenerateResult};
use question::Question;

pub use checker::round_to_significant;
pub use formatter::format_number;
pub use optionstacker::distract;

/// One question of a type drawn uniformly from `enabled`, or `None` when
/// nothing is enabled and the round should be skipped.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, enabled: &BTreeSet<QuestionType>) -> Option<Question> {
    let Some(question_type) = enabled.iter().choose(rng) else {
        tracing::debug!("No question types enabled, withholding round");
        return None;
    };
    Some(engine::placevalue::generate(rng, *question_type))
}

pub fn generate_from_flags<R: Rng + ?Sized>(rng: &mut R, flags: &QuestionTypeFlags) -> GenerateResult<Option<Question>> {
    let enabled = enabled_question_types(flags).map_err(|err| {
        tracing::warn!("Rejected question type flags, {err}");
        GenerateFailure::InvalidOption(err)
    })?;
    Ok(generate(rng, &enabled))
}
