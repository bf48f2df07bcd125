//! Year-over-year change calculation

use serde::{Deserialize, Serialize};

/// A value, its baseline, and the percentage change between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeResult {
    pub current: f64,
    pub previous: Option<f64>,
    /// Positive = increase, Negative = decrease. Unrounded.
    pub percent_change: Option<f64>,
}

/// Percentage change of `current` against `previous`.
///
/// - No baseline: `None`
/// - Zero baseline: `100` if the value grew, `-100` if it went negative,
///   `None` if it stayed at zero
/// - Otherwise relative to the baseline's magnitude
pub fn change(current: f64, previous: Option<f64>) -> ChangeResult {
    let percent_change = previous.and_then(|prev| {
        if prev == 0.0 {
            if current > 0.0 {
                Some(100.0)
            } else if current < 0.0 {
                Some(-100.0)
            } else {
                None
            }
        } else {
            Some((current - prev) / prev.abs() * 100.0)
        }
    });

    ChangeResult {
        current,
        previous,
        percent_change,
    }
}
