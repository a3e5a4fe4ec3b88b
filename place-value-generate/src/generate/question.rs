use rand::Rng;
use serde::{Deserialize, Serialize};
use common_types::Generate::{Operator, QuestionType};

use super::{
    checker,
    engine::RESULT_PRECISION,
    formatter,
    optionstacker,
};

/// Which slot of `a op b = c` is hidden from the player.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Blank {
    OperandA,
    OperandB,
    Result,
}

pub const BLANKS: [Blank; 3] = [Blank::OperandA, Blank::OperandB, Blank::Result];

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Equation {
    pub a: f64,
    pub operator: Operator,
    pub b: f64,
    pub c: f64,
}

impl Equation {
    pub fn new(a: f64, operator: Operator, b: f64) -> Self {
        let c = checker::round_to_significant(operator.apply(a, b), RESULT_PRECISION);
        Self { a, operator, b, c }
    }
    pub fn value_at(&self, blank: Blank) -> f64 {
        match blank {
            Blank::OperandA => self.a,
            Blank::OperandB => self.b,
            Blank::Result => self.c,
        }
    }
    /// Copy of the equation with `value` written into the `blank` slot.
    pub fn with_value_at(&self, blank: Blank, value: f64) -> Self {
        let mut filled = *self;
        match blank {
            Blank::OperandA => filled.a = value,
            Blank::OperandB => filled.b = value,
            Blank::Result => filled.c = value,
        }
        filled
    }
    pub fn is_consistent(&self) -> bool {
        checker::round_to_significant(self.operator.apply(self.a, self.b), RESULT_PRECISION) == self.c
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_type: QuestionType,
    pub equation: Equation,
    pub blank: Blank,
    pub problem: String,
    pub latex_problem: String,
    pub options: Vec<f64>,
    pub answer: f64,
}

impl Question {
    pub fn from_equation<R: Rng + ?Sized>(rng: &mut R, question_type: QuestionType, equation: Equation, blank: Blank) -> Self {
        let answer = equation.value_at(blank);
        let options = optionstacker::distract(rng, answer, blank == Blank::OperandB);
        Self {
            question_type,
            equation,
            blank,
            problem: formatter::format_problem_raw(&equation, blank),
            latex_problem: formatter::format_problem_latex(&equation, blank),
            options,
            answer,
        }
    }
    pub fn is_correct(&self, selected: f64) -> bool {
        selected == self.answer
    }
    /// Position of the correct option, the one highlighted after a wrong pick.
    pub fn answer_index(&self) -> Option<usize> {
        self.options.iter().position(|option| *option == self.answer)
    }
}
