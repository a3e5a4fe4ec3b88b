/*
 *
 * DES: A place value shift, a whole or decimal number multiplied or divided by 10 or 100.
 * ASK: Find the missing operand A, the missing power of ten B, or the missing result C
 *
 */

use rand::Rng;
use common_types::Generate::{Magnitude, OperandB, QuestionType};

use crate::generate::{
    helper,
    question::{Blank, Equation, Question, BLANKS},
};

pub const WHOLE_RANGE: (i32, i32) = (10, 99);
pub const ONE_DECIMAL_RANGE: (f64, f64) = (1.0, 10.0);
pub const TWO_DECIMAL_RANGE: (f64, f64) = (1.0, 91.0);

pub fn operand_a<R: Rng + ?Sized>(rng: &mut R, magnitude: Magnitude) -> f64 {
    match magnitude {
        Magnitude::Whole => f64::from(helper::gen_range_i32_inclusive(rng, WHOLE_RANGE.0, WHOLE_RANGE.1)),
        Magnitude::OneDecimal => helper::gen_range_f64_rounded(rng, ONE_DECIMAL_RANGE.0, ONE_DECIMAL_RANGE.1, magnitude.decimal_places()),
        Magnitude::TwoDecimal => helper::gen_range_f64_rounded(rng, TWO_DECIMAL_RANGE.0, TWO_DECIMAL_RANGE.1, magnitude.decimal_places()),
    }
}

pub fn operand_b<R: Rng + ?Sized>(rng: &mut R, operand_b: OperandB) -> f64 {
    match operand_b {
        OperandB::Ten => 10.0,
        OperandB::Hundred => 100.0,
        OperandB::TenOrHundred => if helper::coin_flip(rng) { 10.0 } else { 100.0 },
    }
}

pub fn blank<R: Rng + ?Sized>(rng: &mut R) -> Blank {
    helper::pick(rng, &BLANKS).unwrap_or(Blank::Result)
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R, question_type: QuestionType) -> Question {
    let a = operand_a(rng, question_type.magnitude);
    let b = operand_b(rng, question_type.operand_b);
    let equation = Equation::new(a, question_type.operator, b);
    let blank = blank(rng);

    let question = Question::from_equation(rng, question_type, equation, blank);
    tracing::debug!(%question_type, problem = %question.problem, answer = question.answer, "Generated question");
    question
}
