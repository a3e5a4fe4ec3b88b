#[allow(non_snake_case)]
pub mod Generate {
    use ::std::collections::{BTreeMap, BTreeSet};
    use ::std::fmt;
    use ::std::str;
    use serde::{Deserialize, Serialize};

    /// Magnitude class of operand A.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub enum Magnitude {
        Whole,
        OneDecimal,
        TwoDecimal,
    }

    impl Magnitude {
        pub fn decimal_places(&self) -> usize {
            match self {
                Magnitude::Whole => 0,
                Magnitude::OneDecimal => 1,
                Magnitude::TwoDecimal => 2,
            }
        }
    }

    impl fmt::Display for Magnitude {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Magnitude::Whole => write!(f, "w"),
                Magnitude::OneDecimal => write!(f, "d1"),
                Magnitude::TwoDecimal => write!(f, "d2"),
            }
        }
    }

    impl str::FromStr for Magnitude {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "w" => Ok(Magnitude::Whole),
                "d1" => Ok(Magnitude::OneDecimal),
                "d2" => Ok(Magnitude::TwoDecimal),
                _ => Err(format!("'{}' is not a valid Magnitude", s)),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub enum Operator {
        Multiply,
        Divide,
    }

    impl Operator {
        pub fn apply(&self, a: f64, b: f64) -> f64 {
            match self {
                Operator::Multiply => a * b,
                Operator::Divide => a / b,
            }
        }
        pub fn symbol(&self) -> &'static str {
            match self {
                Operator::Multiply => "×",
                Operator::Divide => "÷",
            }
        }
    }

    impl fmt::Display for Operator {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                Operator::Multiply => write!(f, "x"),
                Operator::Divide => write!(f, "d"),
            }
        }
    }

    impl str::FromStr for Operator {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "x" => Ok(Operator::Multiply),
                "d" => Ok(Operator::Divide),
                _ => Err(format!("'{}' is not a valid Operator", s)),
            }
        }
    }

    /// Which power of ten operand B takes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    pub enum OperandB {
        Ten,
        Hundred,
        TenOrHundred,
    }

    impl fmt::Display for OperandB {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                OperandB::Ten => write!(f, "10"),
                OperandB::Hundred => write!(f, "100"),
                OperandB::TenOrHundred => write!(f, "10_100"),
            }
        }
    }

    impl str::FromStr for OperandB {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "10" => Ok(OperandB::Ten),
                "100" => Ok(OperandB::Hundred),
                "10_100" => Ok(OperandB::TenOrHundred),
                _ => Err(format!("'{}' is not a valid OperandB", s)),
            }
        }
    }

    // Identifiers look like `w_x_10_100`, `d1_d_100`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct QuestionType {
        pub magnitude: Magnitude,
        pub operator: Operator,
        pub operand_b: OperandB,
    }

    impl QuestionType {
        pub const fn new(magnitude: Magnitude, operator: Operator, operand_b: OperandB) -> Self {
            Self { magnitude, operator, operand_b }
        }
    }

    /// The types offered by the game configuration screen.
    pub const STANDARD_QUESTION_TYPES: [QuestionType; 8] = [
        QuestionType::new(Magnitude::Whole, Operator::Multiply, OperandB::TenOrHundred),
        QuestionType::new(Magnitude::Whole, Operator::Divide, OperandB::Ten),
        QuestionType::new(Magnitude::Whole, Operator::Divide, OperandB::Hundred),
        QuestionType::new(Magnitude::OneDecimal, Operator::Multiply, OperandB::TenOrHundred),
        QuestionType::new(Magnitude::OneDecimal, Operator::Divide, OperandB::Ten),
        QuestionType::new(Magnitude::OneDecimal, Operator::Divide, OperandB::Hundred),
        QuestionType::new(Magnitude::TwoDecimal, Operator::Multiply, OperandB::TenOrHundred),
        QuestionType::new(Magnitude::TwoDecimal, Operator::Divide, OperandB::Ten),
    ];

    impl fmt::Display for QuestionType {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{}_{}_{}", self.magnitude, self.operator, self.operand_b)
        }
    }

    impl str::FromStr for QuestionType {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let invalid = || format!("'{}' is not a valid QuestionType", s);
            let mut parts = s.splitn(3, '_');
            let (Some(magnitude), Some(operator), Some(operand_b)) = (parts.next(), parts.next(), parts.next()) else {
                return Err(invalid());
            };
            Ok(Self {
                magnitude: magnitude.parse().map_err(|_| invalid())?,
                operator: operator.parse().map_err(|_| invalid())?,
                operand_b: operand_b.parse().map_err(|_| invalid())?,
            })
        }
    }

    impl TryFrom<String> for QuestionType {
        type Error = String;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            value.parse()
        }
    }

    impl From<QuestionType> for String {
        fn from(value: QuestionType) -> Self {
            value.to_string()
        }
    }

    /// Checkbox state as stored on a game, keyed by type identifier.
    pub type QuestionTypeFlags = BTreeMap<String, bool>;

    pub fn str_to_question_type<T: AsRef<str>>(id: T) -> Result<QuestionType, String> {
        id.as_ref().trim().parse()
    }

    pub fn str_to_question_types<T: AsRef<str>>(types: T) -> Result<BTreeSet<QuestionType>, String> {
        types.as_ref()
            .split(',')
            .map(|x| x.trim())
            .filter(|x| !x.is_empty())
            .map(|x| x.parse::<QuestionType>())
            .collect()
    }

    pub fn enabled_question_types(flags: &QuestionTypeFlags) -> Result<BTreeSet<QuestionType>, String> {
        flags.iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(id, _)| id.parse::<QuestionType>())
            .collect()
    }

    pub fn question_types_to_flags<'a, I>(enabled: I) -> QuestionTypeFlags
    where
        I: IntoIterator<Item = &'a QuestionType>,
    {
        let enabled: BTreeSet<&QuestionType> = enabled.into_iter().collect();
        STANDARD_QUESTION_TYPES.iter()
            .chain(enabled.iter().copied())
            .map(|question_type| (question_type.to_string(), enabled.contains(question_type)))
            .collect()
    }
}

#[allow(non_snake_case)]
pub mod Game {
    use ::std::fmt;
    use ::std::str;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum GameState {
        Waiting,
        Running,
        Finished,
    }

    impl fmt::Display for GameState {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                GameState::Waiting => write!(f, "waiting"),
                GameState::Running => write!(f, "running"),
                GameState::Finished => write!(f, "finished"),
            }
        }
    }

    impl str::FromStr for GameState {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "waiting" => Ok(GameState::Waiting),
                "running" => Ok(GameState::Running),
                "finished" => Ok(GameState::Finished),
                _ => Err(format!("'{}' is not a valid GameState", s)),
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PlayerRecord {
        pub score: u64,
        pub questions_answered: u32,
        pub questions_correct: u32,
    }

    impl PlayerRecord {
        /// Whole percent of answers that were correct, 0 before any answer.
        pub fn accuracy_percent(&self) -> u32 {
            if self.questions_answered == 0 {
                return 0;
            }
            (f64::from(self.questions_correct) * 100.0 / f64::from(self.questions_answered)).round() as u32
        }
    }
}
