//! Random arithmetic problems.
//!
//! A problem is an equation such as `56 = 7 × 8` whose left-hand side is
//! either the true result or a nearby wrong value. The player judges whether
//! the equation holds.

use std::fmt;

use rand::Rng;

/// Probability that a generated equation is true.
const CORRECT_PROBABILITY: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '×',
            Operator::Div => '÷',
        }
    }

    /// Integer result; division floors.
    pub fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            Operator::Add => a + b,
            Operator::Sub => a - b,
            Operator::Mul => a * b,
            Operator::Div => a.div_euclid(b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub operator: Operator,
    pub a: i64,
    pub b: i64,
    /// The value shown to the player.
    pub displayed: i64,
    /// Whether `displayed` equals `a operator b`.
    pub is_correct: bool,
}

impl Problem {
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} {} {}", self.displayed, self.a, self.operator, self.b)
    }
}

/// Generates a problem from the thread-local random source.
pub fn generate() -> Problem {
    generate_with(&mut rand::rng())
}

pub fn generate_with<R: Rng>(rng: &mut R) -> Problem {
    let operator = Operator::ALL[rng.random_range(0..Operator::ALL.len())];
    let (a, b) = pick_operands(rng, operator);
    let correct = operator.apply(a, b);

    let (displayed, is_correct) = if rng.random_bool(CORRECT_PROBABILITY) {
        (correct, true)
    } else {
        let delta = rng.random_range(1..=(correct.abs() / 4).max(3));
        let mut displayed = if rng.random_bool(0.5) {
            correct + delta
        } else {
            correct - delta
        };
        if operator == Operator::Div && displayed == 0 {
            displayed += 1;
        }
        (displayed, false)
    };

    Problem {
        operator,
        a,
        b,
        displayed,
        is_correct,
    }
}

fn pick_operands<R: Rng>(rng: &mut R, operator: Operator) -> (i64, i64) {
    match operator {
        Operator::Mul | Operator::Div => {
            let a = rng.random_range(2..=12);
            let b = rng.random_range(2..=12);
            // Exact division
            if operator == Operator::Div {
                (a * b, b)
            } else {
                (a, b)
            }
        }
        Operator::Add | Operator::Sub => {
            let a = rng.random_range(20..=120);
            let b = rng.random_range(1..=120);
            if operator == Operator::Sub && b > a {
                (b, a)
            } else {
                (a, b)
            }
        }
    }
}
