use ::std::fmt::Write;
use common_types::Generate::Operator;

use super::question::{Blank, Equation};

pub const BLANK_RAW: &'static str = "?";
pub const BLANK_LATEX: &'static str = r#"\square"#;

pub const LABEL_TIMES: &'static str = r#"\times"#;
pub const LABEL_DIV: &'static str = r#"\div"#;

// Outside this window numbers are written in exponent form, the same
// cut-offs a browser uses when it prints a number.
const EXPONENT_UPPER: f64 = 1e21;
const EXPONENT_LOWER: f64 = 1e-6;

/// Shortest text that reads back as the same `f64`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_owned()
        } else if value > 0.0 {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }
    let magnitude = value.abs();
    if magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
            _ => formatted,
        };
    }
    format!("{}", value)
}

fn format_latex_number(value: f64) -> String {
    let raw = format_number(value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => format!(r#"{mantissa}\times10^{{{}}}"#, exponent.trim_start_matches('+')),
        None => raw,
    }
}

fn latex_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Multiply => LABEL_TIMES,
        Operator::Divide => LABEL_DIV,
    }
}

/// `42 × 10 = ?` style prompt.
pub fn format_problem_raw(equation: &Equation, blank: Blank) -> String {
    let slot = |at: Blank, value: f64| {
        if at == blank { BLANK_RAW.to_owned() } else { format_number(value) }
    };
    format!(
        "{} {} {} = {}",
        slot(Blank::OperandA, equation.a),
        equation.operator.symbol(),
        slot(Blank::OperandB, equation.b),
        slot(Blank::Result, equation.c),
    )
}

pub fn format_problem_latex(equation: &Equation, blank: Blank) -> String {
    let mut out = String::new();
    let parts = [
        (Blank::OperandA, equation.a),
        (Blank::OperandB, equation.b),
        (Blank::Result, equation.c),
    ];
    for (index, (at, value)) in parts.iter().enumerate() {
        let term = if *at == blank { BLANK_LATEX.to_owned() } else { format_latex_number(*value) };
        let _ = match index {
            0 => write!(out, "{term}"),
            1 => write!(out, r#" {} {term}"#, latex_operator(equation.operator)),
            _ => write!(out, " = {term}"),
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_print_like_the_browser() {
        assert_eq!(format_number(420.0), "420");
        assert_eq!(format_number(5.5), "5.5");
        assert_eq!(format_number(0.042), "0.042");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e21), "1.5e+21");
    }

    #[test]
    fn latex_prompt_uses_operator_macros() {
        let equation = Equation::new(3.7, Operator::Divide, 100.0);
        assert_eq!(format_problem_latex(&equation, Blank::OperandA), r#"\square \div 100 = 0.037"#);
        assert_eq!(format_problem_raw(&equation, Blank::OperandA), "? ÷ 100 = 0.037");
    }
}
