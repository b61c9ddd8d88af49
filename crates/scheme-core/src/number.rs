//! Numeric payload.
//!
//! The teacher's `Value` keeps `Int(i64)` and `Float(f64)` as separate
//! variants (value.rs). spec.md §3.1 asks for a single numeric datum that
//! carries an exactness flag instead, so this wraps both payloads behind
//! one type and tracks exactness explicitly rather than via the variant
//! tag.

use std::fmt;

/// A Scheme number: either an exact integer or an inexact float.
///
/// Exactness is tracked explicitly (spec.md §3.1) rather than inferred
/// from which Rust type happens to hold the bits, so contagion rules
/// (exact op inexact -> inexact) have one obvious place to live.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Exact(i64),
    Inexact(f64),
}

impl Number {
    pub fn is_exact(&self) -> bool {
        matches!(self, Number::Exact(_))
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Exact(i) => *i as f64,
            Number::Inexact(f) => *f,
        }
    }

    /// Convert to an exact integer if the value has no fractional part.
    pub fn to_exact(&self) -> Number {
        match self {
            Number::Exact(i) => Number::Exact(*i),
            Number::Inexact(f) => Number::Exact(*f as i64),
        }
    }

    pub fn to_inexact(&self) -> Number {
        Number::Inexact(self.to_f64())
    }

    /// `equal?`/`eqv?` compare numbers by exactness tag *and* value (a
    /// Heist/R7RS convention: `(eqv? 1 1.0)` is `#f`). See
    /// `heist_types_toolkit.hpp`'s `prm_compare_atomic_values`, which
    /// checks `num.is_exact() == num2.is_exact()` before comparing magnitude.
    pub fn numerically_equal(&self, other: &Number) -> bool {
        if self.is_exact() != other.is_exact() {
            return false;
        }
        match (self, other) {
            (Number::Exact(a), Number::Exact(b)) => a == b,
            (Number::Inexact(a), Number::Inexact(b)) => a == b,
            _ => unreachable!("exactness already matched"),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Exact(i) => write!(f, "{}", i),
            // Always show a decimal point for inexact numbers, matching
            // son.rs's `format_value` treatment of `Value::Float`.
            Number::Inexact(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{:.1}", n),
            Number::Inexact(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_inexact_with_same_magnitude_are_not_numerically_equal() {
        assert!(!Number::Exact(1).numerically_equal(&Number::Inexact(1.0)));
    }

    #[test]
    fn same_exactness_and_magnitude_are_equal() {
        assert!(Number::Exact(3).numerically_equal(&Number::Exact(3)));
        assert!(Number::Inexact(2.5).numerically_equal(&Number::Inexact(2.5)));
    }

    #[test]
    fn display_shows_decimal_point_for_whole_floats() {
        assert_eq!(Number::Inexact(4.0).to_string(), "4.0");
        assert_eq!(Number::Exact(4).to_string(), "4");
    }
}
