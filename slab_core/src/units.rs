//! # Unit Types
//!
//! Type-safe wrappers for the quantities that appear on a slab quotation.
//! They are plain `f64` newtypes that serialize as bare numbers, so JSON
//! output stays clean while the compiler keeps metres, tonnes and shillings
//! apart.
//!
//! ## Metric Units
//!
//! - Length: metres (m)
//! - Area: square metres (m²)
//! - Mass: kilograms (kg), tonnes (t = 1000 kg)
//! - Money: Kenyan shillings (KSh)
//!
//! ## Example
//!
//! ```rust
//! use slab_core::units::{Kilograms, Shillings, Tonnes};
//!
//! let load: Tonnes = Kilograms(2500.0).into();
//! assert_eq!(load.0, 2.5);
//!
//! assert_eq!(Shillings(15600.0).to_string(), "KSh 15,600.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

// ============================================================================
// Length and Area
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMeters(pub f64);

impl Mul for Meters {
    type Output = SqMeters;
    fn mul(self, rhs: Meters) -> SqMeters {
        SqMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// Mass
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in metric tonnes (1 t = 1000 kg)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonnes(pub f64);

impl From<Kilograms> for Tonnes {
    fn from(kg: Kilograms) -> Self {
        Tonnes(kg.0 / 1000.0)
    }
}

// ============================================================================
// Money
// ============================================================================

/// Amount in Kenyan shillings
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shillings(pub f64);

impl fmt::Display for Shillings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KSh {}", format_grouped(self.0, 2))
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(SqMeters);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Tonnes);
impl_arithmetic!(Shillings);

// ============================================================================
// Formatting
// ============================================================================

/// Format a number with a fixed number of decimals and comma thousands
/// separators, e.g. `1234567.891` with 2 decimals gives `1,234,567.89`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    // "-0.00" reads badly on a quotation
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilograms_to_tonnes() {
        let t: Tonnes = Kilograms(1850.0).into();
        assert!((t.0 - 1.85).abs() < 1e-12);
    }

    #[test]
    fn test_area_from_lengths() {
        let area = Meters(3.0) * Meters(5.0);
        assert_eq!(area, SqMeters(15.0));
    }

    #[test]
    fn test_arithmetic() {
        let mut total = Shillings(100.0);
        total += Shillings(50.0);
        assert_eq!(total.0, 150.0);
        assert_eq!((total - Shillings(25.0)).0, 125.0);
        assert_eq!((total * 2.0).0, 300.0);
        assert_eq!((total / 3.0).0, 50.0);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0, 2), "0.00");
        assert_eq!(format_grouped(999.5, 2), "999.50");
        assert_eq!(format_grouped(1000.0, 2), "1,000.00");
        assert_eq!(format_grouped(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_grouped(15600.0, 0), "15,600");
        assert_eq!(format_grouped(-2500.0, 2), "-2,500.00");
        assert_eq!(format_grouped(-0.001, 2), "0.00");
    }

    #[test]
    fn test_shillings_display() {
        assert_eq!(Shillings(70200.0).to_string(), "KSh 70,200.00");
    }

    #[test]
    fn test_serialization() {
        let m = Meters(12.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: Meters = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
