//! Period-over-period comparisons
//!
//! Headline numbers (totals, conversion rates) are shown next to their value
//! in the previous period.

use serde::{Deserialize, Serialize};

/// Direction of change against the previous period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// A value compared with its previous-period counterpart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub current: f64,
    pub previous: f64,
    /// current - previous
    pub delta: f64,
    pub direction: Direction,
    /// Relative change in percent; `None` when growing from zero
    pub percent_change: Option<f64>,
}

impl Comparison {
    pub fn between(current: f64, previous: f64) -> Self {
        let delta = current - previous;
        let direction = if delta > 0.0 {
            Direction::Up
        } else if delta < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        };

        let percent_change = if previous != 0.0 {
            Some(delta / previous.abs() * 100.0)
        } else if current == 0.0 {
            Some(0.0)
        } else {
            None
        };

        Self {
            current,
            previous,
            delta,
            direction,
            percent_change,
        }
    }

    pub fn counts(current: usize, previous: usize) -> Self {
        Self::between(current as f64, previous as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase() {
        let c = Comparison::between(125.0, 100.0);
        assert_eq!(c.direction, Direction::Up);
        assert_eq!(c.delta, 25.0);
        assert!((c.percent_change.unwrap() - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_decrease() {
        let c = Comparison::counts(5, 10);
        assert_eq!(c.direction, Direction::Down);
        assert_eq!(c.delta, -5.0);
        assert!((c.percent_change.unwrap() - (-50.0)).abs() < 0.001);
    }

    #[test]
    fn test_growth_from_zero_is_unbounded() {
        let c = Comparison::counts(3, 0);
        assert_eq!(c.direction, Direction::Up);
        assert_eq!(c.percent_change, None);
    }

    #[test]
    fn test_both_zero_is_flat() {
        let c = Comparison::counts(0, 0);
        assert_eq!(c.direction, Direction::Flat);
        assert_eq!(c.percent_change, Some(0.0));
    }

    #[test]
    fn test_comparison_serialization() {
        let json = serde_json::to_string(&Comparison::counts(3, 0)).unwrap();
        assert!(json.contains("\"direction\":\"up\""));
        assert!(json.contains("\"percent_change\":null"));
    }
}
