//! Decision variable encodings.
//!
//! A [`Variable`] is one gene of a [`Solution`](super::Solution). Scalar
//! reals and integers carry their own bounds; binary-coded reals carry the
//! bounds of the decoded value; arrays share one pair of bounds per element.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of bits used for binary-coded reals.
pub const DEFAULT_PRECISION: usize = 30;

/// A decision variable value with its domain.
///
/// Every variant derives `Clone`, so cloning a solution never aliases
/// variable storage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Variable {
    /// A bounded real value.
    Real {
        /// Current value.
        value: f64,
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },

    /// A bounded integer value.
    Int {
        /// Current value.
        value: i64,
        /// Lower bound.
        lower: i64,
        /// Upper bound.
        upper: i64,
    },

    /// A fixed-length bit string.
    Binary {
        /// The bits, least significant first.
        bits: Vec<bool>,
    },

    /// A bit string decoded into a real value in `[lower, upper]`.
    BinaryReal {
        /// The bits, least significant first.
        bits: Vec<bool>,
        /// Lower bound of the decoded value.
        lower: f64,
        /// Upper bound of the decoded value.
        upper: f64,
    },

    /// A permutation of `0..n`.
    Permutation {
        /// The ordering.
        order: Vec<usize>,
    },

    /// A vector of reals sharing one pair of bounds per element.
    ArrayReal {
        /// Element values.
        values: Vec<f64>,
        /// Per-element lower bounds.
        lower: Vec<f64>,
        /// Per-element upper bounds.
        upper: Vec<f64>,
    },

    /// A vector of integers with per-element bounds.
    ArrayInt {
        /// Element values.
        values: Vec<i64>,
        /// Per-element lower bounds.
        lower: Vec<i64>,
        /// Per-element upper bounds.
        upper: Vec<i64>,
    },
}

impl Variable {
    /// Creates a real variable, clamping `value` into the bounds.
    pub fn real(value: f64, lower: f64, upper: f64) -> Self {
        Variable::Real {
            value: value.clamp(lower, upper),
            lower,
            upper,
        }
    }

    /// Creates an integer variable, clamping `value` into the bounds.
    pub fn int(value: i64, lower: i64, upper: i64) -> Self {
        Variable::Int {
            value: value.clamp(lower, upper),
            lower,
            upper,
        }
    }

    /// Creates an identity permutation of length `n`.
    pub fn permutation(n: usize) -> Self {
        Variable::Permutation {
            order: (0..n).collect(),
        }
    }

    /// Whether the variable exposes a single decoded real value.
    ///
    /// This is the capability algorithms check instead of asking which
    /// encoding a problem uses.
    pub fn has_real_value(&self) -> bool {
        matches!(
            self,
            Variable::Real { .. } | Variable::Int { .. } | Variable::BinaryReal { .. }
        )
    }

    /// The decoded real value, if the encoding has one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Variable::Real { value, .. } => Some(*value),
            Variable::Int { value, .. } => Some(*value as f64),
            Variable::BinaryReal { bits, lower, upper } => Some(decode(bits, *lower, *upper)),
            _ => None,
        }
    }

    /// Sets the decoded value, clamped into bounds.
    ///
    /// Integers are rounded; binary reals are re-encoded to the nearest
    /// representable value. Returns `false` for encodings without a scalar
    /// value.
    pub fn set_value(&mut self, v: f64) -> bool {
        match self {
            Variable::Real {
                value,
                lower,
                upper,
            } => {
                *value = v.clamp(*lower, *upper);
                true
            }
            Variable::Int {
                value,
                lower,
                upper,
            } => {
                *value = (v.round() as i64).clamp(*lower, *upper);
                true
            }
            Variable::BinaryReal { bits, lower, upper } => {
                encode(bits, v, *lower, *upper);
                true
            }
            _ => false,
        }
    }

    /// Lower bound of the scalar value, if any.
    pub fn lower_bound(&self) -> Option<f64> {
        match self {
            Variable::Real { lower, .. } | Variable::BinaryReal { lower, .. } => Some(*lower),
            Variable::Int { lower, .. } => Some(*lower as f64),
            _ => None,
        }
    }

    /// Upper bound of the scalar value, if any.
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            Variable::Real { upper, .. } | Variable::BinaryReal { upper, .. } => Some(*upper),
            Variable::Int { upper, .. } => Some(*upper as f64),
            _ => None,
        }
    }

    /// Number of genes: bits, permutation length, array length, or 1.
    pub fn len(&self) -> usize {
        match self {
            Variable::Binary { bits } | Variable::BinaryReal { bits, .. } => bits.len(),
            Variable::Permutation { order } => order.len(),
            Variable::ArrayReal { values, .. } => values.len(),
            Variable::ArrayInt { values, .. } => values.len(),
            Variable::Real { .. } | Variable::Int { .. } => 1,
        }
    }

    /// Whether the variable has no genes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bits of a binary-encoded variable.
    pub fn bits(&self) -> Option<&[bool]> {
        match self {
            Variable::Binary { bits } | Variable::BinaryReal { bits, .. } => Some(bits),
            _ => None,
        }
    }

    /// Mutable bits of a binary-encoded variable.
    pub fn bits_mut(&mut self) -> Option<&mut Vec<bool>> {
        match self {
            Variable::Binary { bits } | Variable::BinaryReal { bits, .. } => Some(bits),
            _ => None,
        }
    }

    /// The ordering of a permutation variable.
    pub fn order(&self) -> Option<&[usize]> {
        match self {
            Variable::Permutation { order } => Some(order),
            _ => None,
        }
    }

    /// Mutable ordering of a permutation variable.
    pub fn order_mut(&mut self) -> Option<&mut Vec<usize>> {
        match self {
            Variable::Permutation { order } => Some(order),
            _ => None,
        }
    }

    /// Restores the bound invariant after an operator moved a value out.
    pub fn repair(&mut self) {
        match self {
            Variable::Real {
                value,
                lower,
                upper,
            } => *value = value.clamp(*lower, *upper),
            Variable::Int {
                value,
                lower,
                upper,
            } => *value = (*value).clamp(*lower, *upper),
            Variable::ArrayReal {
                values,
                lower,
                upper,
            } => {
                for (v, (lo, hi)) in values.iter_mut().zip(lower.iter().zip(upper.iter())) {
                    *v = v.clamp(*lo, *hi);
                }
            }
            Variable::ArrayInt {
                values,
                lower,
                upper,
            } => {
                for (v, (lo, hi)) in values.iter_mut().zip(lower.iter().zip(upper.iter())) {
                    *v = (*v).clamp(*lo, *hi);
                }
            }
            Variable::Binary { .. }
            | Variable::BinaryReal { .. }
            | Variable::Permutation { .. } => {}
        }
    }

    /// Whether every value lies inside its bounds (and permutations are valid).
    pub fn is_within_bounds(&self) -> bool {
        match self {
            Variable::Real {
                value,
                lower,
                upper,
            } => *lower <= *value && *value <= *upper,
            Variable::Int {
                value,
                lower,
                upper,
            } => *lower <= *value && *value <= *upper,
            Variable::ArrayReal {
                values,
                lower,
                upper,
            } => values
                .iter()
                .zip(lower.iter().zip(upper.iter()))
                .all(|(v, (lo, hi))| lo <= v && v <= hi),
            Variable::ArrayInt {
                values,
                lower,
                upper,
            } => values
                .iter()
                .zip(lower.iter().zip(upper.iter()))
                .all(|(v, (lo, hi))| lo <= v && v <= hi),
            Variable::Permutation { order } => {
                let mut seen = vec![false; order.len()];
                order.iter().all(|&v| {
                    if v >= seen.len() || seen[v] {
                        false
                    } else {
                        seen[v] = true;
                        true
                    }
                })
            }
            Variable::Binary { .. } | Variable::BinaryReal { .. } => true,
        }
    }
}

/// Decodes a bit string into `lower + int(bits) * (upper - lower) / (2^n - 1)`.
pub fn decode(bits: &[bool], lower: f64, upper: f64) -> f64 {
    if bits.is_empty() {
        return lower;
    }
    let mut value = 0.0;
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            value += 2f64.powi(i as i32);
        }
    }
    let steps = 2f64.powi(bits.len() as i32) - 1.0;
    lower + value * (upper - lower) / steps
}

/// Encodes the nearest representable value of `v` into `bits`.
fn encode(bits: &mut [bool], v: f64, lower: f64, upper: f64) {
    let n = bits.len();
    if n == 0 {
        return;
    }
    let steps = 2f64.powi(n as i32) - 1.0;
    let ratio = if upper > lower {
        ((v - lower) / (upper - lower)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut remain = (ratio * steps).round() as u128;
    for bit in bits.iter_mut() {
        *bit = remain & 1 == 1;
        remain >>= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_clamped_on_creation() {
        let v = Variable::real(12.0, -1.0, 1.0);
        assert_eq!(v.value(), Some(1.0));
        assert!(v.is_within_bounds());
    }

    #[test]
    fn test_int_set_value_rounds_and_clamps() {
        let mut v = Variable::int(0, 0, 10);
        assert!(v.set_value(3.6));
        assert_eq!(v.value(), Some(4.0));
        v.set_value(99.0);
        assert_eq!(v.value(), Some(10.0));
    }

    #[test]
    fn test_binary_real_decode_extremes() {
        let all_zero = Variable::BinaryReal {
            bits: vec![false; 8],
            lower: -2.0,
            upper: 6.0,
        };
        let all_one = Variable::BinaryReal {
            bits: vec![true; 8],
            lower: -2.0,
            upper: 6.0,
        };
        assert_eq!(all_zero.value(), Some(-2.0));
        assert!((all_one.value().unwrap() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_binary_real_encode_round_trip_precision() {
        let mut v = Variable::BinaryReal {
            bits: vec![false; 16],
            lower: 0.0,
            upper: 1.0,
        };
        v.set_value(0.3);
        let step = 1.0 / (2f64.powi(16) - 1.0);
        assert!((v.value().unwrap() - 0.3).abs() <= step);
    }

    #[test]
    fn test_binary_has_no_scalar_value() {
        let mut v = Variable::Binary {
            bits: vec![true, false],
        };
        assert!(!v.has_real_value());
        assert_eq!(v.value(), None);
        assert!(!v.set_value(1.0));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_repair_array_real() {
        let mut v = Variable::ArrayReal {
            values: vec![-5.0, 0.5, 5.0],
            lower: vec![0.0; 3],
            upper: vec![1.0; 3],
        };
        assert!(!v.is_within_bounds());
        v.repair();
        assert!(v.is_within_bounds());
        if let Variable::ArrayReal { values, .. } = &v {
            assert_eq!(values, &vec![0.0, 0.5, 1.0]);
        }
    }

    #[test]
    fn test_permutation_validity() {
        let ok = Variable::Permutation {
            order: vec![2, 0, 1],
        };
        let dup = Variable::Permutation {
            order: vec![0, 0, 1],
        };
        assert!(ok.is_within_bounds());
        assert!(!dup.is_within_bounds());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Variable::Binary {
            bits: vec![false; 4],
        };
        let mut copy = original.clone();
        copy.bits_mut().unwrap()[0] = true;
        assert_eq!(original.bits().unwrap()[0], false);
    }
}
