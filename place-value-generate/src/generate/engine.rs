pub mod placevalue;

pub type GenerateResult<T> = Result<T, GenerateFailure>;

#[derive(Debug)]
pub enum GenerateFailure {
    InvalidOption( String ),
}

impl ::std::fmt::Display for GenerateFailure {
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        match self {
            GenerateFailure::InvalidOption(reason) => write!(f, "invalid question option: {reason}"),
        }
    }
}

pub const OPTIONS_PER_QUESTION: usize = 4;

// Results are kept to 15 significant digits, enough to strip binary noise
// such as 0.30000000000000004 while leaving every real digit.
pub const RESULT_PRECISION: usize = 15;

pub const MAX_DISTRACTOR_ATTEMPTS: usize = 16;

pub const PLACE_VALUE_MULTIPLIERS: [f64; 4] = [10.0, 100.0, 0.1, 0.01];

// 1000 only ever appears here, operand B is generated as 10 or 100
pub const POWER_OF_TEN_POOL: [f64; 5] = [10.0, 100.0, 1000.0, 0.1, 0.01];
