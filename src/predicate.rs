//! A small `key op value` predicate language for [`ContextChecker`].
//!
//! [`ContextChecker`]: crate::checker::ContextChecker

use std::cmp::Ordering;
use std::collections::HashMap;

/// Operator spellings; ties at the same position go to the longer one
const OPERATORS: [(&str, Operator); 6] = [
    ("<=", Operator::LessOrEqual),
    (">=", Operator::GreaterOrEqual),
    ("!=", Operator::NotEqual),
    ("=", Operator::Equal),
    ("<", Operator::Less),
    (">", Operator::Greater),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl Operator {
    /// Whether an observed ordering of `actual` against `expected` satisfies
    /// this operator
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
            Operator::Less => ordering == Ordering::Less,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::LessOrEqual => ordering != Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

/// A parsed predicate borrowing from its source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predicate<'a> {
    pub key: &'a str,
    pub operator: Operator,
    pub value: &'a str,
}

impl<'a> Predicate<'a> {
    /// Splits `text` at its first operator, e.g. `time < 2025-12-31T23:59:59Z`
    ///
    /// Returns `None` when no operator is present or either side is blank.
    pub fn parse(text: &'a str) -> Option<Self> {
        let (position, spelling, operator) = OPERATORS
            .iter()
            .filter_map(|(spelling, operator)| {
                text.find(*spelling).map(|position| (position, *spelling, *operator))
            })
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.len().cmp(&a.1.len())))?;

        let key = text[..position].trim();
        let value = text[position + spelling.len()..].trim();
        if key.is_empty() || value.is_empty() {
            return None;
        }

        Some(Self {
            key,
            operator,
            value,
        })
    }

    /// Evaluates the predicate against a context; missing keys never match
    ///
    /// Values are compared numerically when both parse as numbers, otherwise
    /// lexicographically, which orders RFC 3339 timestamps correctly.
    pub fn evaluate(&self, context: &HashMap<String, String>) -> bool {
        let Some(actual) = context.get(self.key) else {
            return false;
        };

        let ordering = match (actual.parse::<f64>(), self.value.parse::<f64>()) {
            (Ok(actual), Ok(expected)) => actual.partial_cmp(&expected),
            _ => Some(actual.as_str().cmp(self.value)),
        };

        ordering.is_some_and(|ordering| self.operator.accepts(ordering))
    }
}
