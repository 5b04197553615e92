//! Rule catalog, difficulty gate and problem generation.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::arith::{
    factorial, fibonacci, is_prime, multiply_digits, reverse_digits, sum_digits,
};
use crate::config::DifficultyConfig;

/// Highest difficulty any rule carries; levels past the last tier admit it.
pub const MAX_DIFFICULTY: u8 = 5;

/// Eligible rules for a level, in catalog order.
pub type RulePool = SmallVec<[RuleKind; 16]>;

/// Transformation the player applies to the displayed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Repeat,
    Square,
    Double,
    IsPrime,
    Fibonacci,
    Reverse,
    SquareRoot,
    AddDigits,
    MultiplyDigits,
    Subtract,
    Divide,
    Modulo,
    Power,
    Factorial,
}

impl RuleKind {
    /// Every rule in catalog order.
    pub const ALL: [Self; 14] = [
        Self::Repeat,
        Self::Square,
        Self::Double,
        Self::IsPrime,
        Self::Fibonacci,
        Self::Reverse,
        Self::SquareRoot,
        Self::AddDigits,
        Self::MultiplyDigits,
        Self::Subtract,
        Self::Divide,
        Self::Modulo,
        Self::Power,
        Self::Factorial,
    ];

    #[must_use]
    pub const fn difficulty(self) -> u8 {
        match self {
            Self::Repeat => 1,
            Self::Square | Self::Double | Self::Subtract => 2,
            Self::IsPrime
            | Self::Reverse
            | Self::AddDigits
            | Self::MultiplyDigits
            | Self::Divide => 3,
            Self::Fibonacci | Self::SquareRoot | Self::Modulo | Self::Power => 4,
            Self::Factorial => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repeat => "repeat",
            Self::Square => "square",
            Self::Double => "double",
            Self::IsPrime => "is_prime",
            Self::Fibonacci => "fibonacci",
            Self::Reverse => "reverse",
            Self::SquareRoot => "square_root",
            Self::AddDigits => "add_digits",
            Self::MultiplyDigits => "multiply_digits",
            Self::Subtract => "subtract",
            Self::Divide => "divide",
            Self::Modulo => "modulo",
            Self::Power => "power",
            Self::Factorial => "factorial",
        }
    }

    /// Draw a solvable instance of this rule.
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> Problem {
        match self {
            Self::Repeat => {
                let n = rng.gen_range(1..=9);
                Problem::new(self, n, "Type the number you see", Answer::Number(n))
            }
            Self::Square => {
                let n = rng.gen_range(2..=12);
                Problem::new(self, n, "Type the square of the number", Answer::Number(n * n))
            }
            Self::Double => {
                let n = rng.gen_range(5..=20);
                Problem::new(self, n, "Type double the number", Answer::Number(n * 2))
            }
            Self::IsPrime => {
                let n = rng.gen_range(2..=50);
                Problem::new(
                    self,
                    n,
                    "Is this number prime? (yes/no)",
                    Answer::YesNo(is_prime(n)),
                )
            }
            Self::Fibonacci => {
                let index = rng.gen_range(3..=10);
                let current = fib_i64(index);
                Problem::new(
                    self,
                    current,
                    format!("Type the next Fibonacci number after {current}"),
                    Answer::Number(fib_i64(index + 1)),
                )
            }
            Self::Reverse => {
                let n = rng.gen_range(10..=99);
                Problem::new(self, n, "Reverse the digits", Answer::Number(reverse_digits(n)))
            }
            Self::SquareRoot => {
                let root = rng.gen_range(2..=10);
                Problem::new(self, root * root, "What is the square root?", Answer::Number(root))
            }
            Self::AddDigits => {
                let n = rng.gen_range(10..=99);
                Problem::new(self, n, "Add the digits together", Answer::Number(sum_digits(n)))
            }
            Self::MultiplyDigits => {
                let n = rng.gen_range(10..=99);
                Problem::new(
                    self,
                    n,
                    "Multiply the digits",
                    Answer::Number(multiply_digits(n)),
                )
            }
            Self::Subtract => {
                let n = rng.gen_range(10..=50);
                let subtractor = rng.gen_range(1..=9);
                Problem::new(
                    self,
                    n,
                    format!("Subtract {subtractor} from this number"),
                    Answer::Number(n - subtractor),
                )
                .with_extra(Operand::Subtractor(subtractor))
            }
            Self::Divide => {
                let divisor = rng.gen_range(2..=5);
                let quotient = rng.gen_range(2..=10);
                Problem::new(
                    self,
                    divisor * quotient,
                    format!("Divide by {divisor}"),
                    Answer::Number(quotient),
                )
                .with_extra(Operand::Divisor(divisor))
            }
            Self::Modulo => {
                let n = rng.gen_range(10..=50);
                let modulus = rng.gen_range(2..=9);
                Problem::new(
                    self,
                    n,
                    format!("What is the remainder when divided by {modulus}?"),
                    Answer::Number(n % modulus),
                )
                .with_extra(Operand::Modulus(modulus))
            }
            Self::Power => {
                let n: i64 = rng.gen_range(2..=5);
                let exponent: u32 = rng.gen_range(2..=3);
                Problem::new(
                    self,
                    n,
                    format!("Calculate {n}^{exponent}"),
                    Answer::Number(n.pow(exponent)),
                )
                .with_extra(Operand::Exponent(exponent))
            }
            Self::Factorial => {
                let n: u32 = rng.gen_range(2..=6);
                Problem::new(
                    self,
                    i64::from(n),
                    format!("Calculate {n}! (factorial)"),
                    Answer::Number(i64::try_from(factorial(n)).unwrap_or(i64::MAX)),
                )
            }
        }
    }
}

fn fib_i64(index: u32) -> i64 {
    i64::try_from(fibonacci(index)).unwrap_or(i64::MAX)
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or(())
    }
}

/// Expected answer of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(i64),
    /// Rendered as `yes` / `no`.
    YesNo(bool),
}

impl Answer {
    /// Case-insensitive comparison against the canonical rendering; surrounding whitespace is ignored.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        input.trim().eq_ignore_ascii_case(&self.to_string())
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::YesNo(true) => f.write_str("yes"),
            Self::YesNo(false) => f.write_str("no"),
        }
    }
}

/// Secondary operand named in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Operand {
    Subtractor(i64),
    Divisor(i64),
    Modulus(i64),
    Exponent(u32),
}

/// A generated problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub rule: RuleKind,
    /// The number shown to the player.
    pub number: i64,
    pub description: String,
    pub expected: Answer,
    #[serde(default)]
    pub extra: Option<Operand>,
}

impl Problem {
    fn new(rule: RuleKind, number: i64, description: impl Into<String>, expected: Answer) -> Self {
        Self {
            rule,
            number,
            description: description.into(),
            expected,
            extra: None,
        }
    }

    fn with_extra(mut self, extra: Operand) -> Self {
        self.extra = Some(extra);
        self
    }

    #[must_use]
    pub fn is_correct(&self, input: &str) -> bool {
        self.expected.matches(input)
    }
}

/// Rules admitted at `level`, in catalog order.
#[must_use]
pub fn eligible_rules(level: u32, gate: &DifficultyConfig) -> RulePool {
    let max = gate.max_difficulty_for_level(level);
    RuleKind::ALL
        .into_iter()
        .filter(|rule| rule.difficulty() <= max)
        .collect()
}

/// Uniformly pick one rule from the pool admitted at `level`.
pub fn pick_rule<R: Rng + ?Sized>(level: u32, gate: &DifficultyConfig, rng: &mut R) -> RuleKind {
    let pool = eligible_rules(level, gate);
    if pool.is_empty() {
        return RuleKind::Repeat;
    }
    let rule = pool[rng.gen_range(0..pool.len())];
    log::debug!("rule pick | level {level} pool {} -> {rule}", pool.len());
    rule
}
