//! Geometry for the decision engine.
//!
//! Map coordinates arrive as integers. Nearest-site comparisons use exact
//! integer squared distances; reported distances use fixed-point so that
//! every machine computes identical values.

use std::fmt;

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for reported distances.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Integer map position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Map origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Squared Euclidean distance in `i64`.
    ///
    /// Exact for any on-map pair; saturates at `i64::MAX` for coordinates
    /// far enough apart to overflow.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Euclidean distance.
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        root_of_squared(self.distance_squared(other))
    }

    /// Whether `other` lies strictly closer than `radius`.
    #[must_use]
    pub fn is_within(self, other: Self, radius: i32) -> bool {
        let r = i64::from(radius);
        self.distance_squared(other) < r * r
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// Euclidean distance between two positions.
#[must_use]
pub fn distance_between(from: Position, to: Position) -> Fixed {
    from.distance(to)
}

/// Distance from a squared distance.
#[must_use]
pub fn root_of_squared(distance_squared: i64) -> Fixed {
    fixed_sqrt(Fixed::saturating_from_num(distance_squared))
}

/// Computes the square root of a fixed-point number using binary search.
fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }

    let mut low = Fixed::ZERO;
    let mut high = if value > Fixed::ONE { value } else { Fixed::ONE };

    for _ in 0..64 {
        let mid = low + (high - low) / 2;
        let mid_sq = mid.saturating_mul(mid);

        if mid_sq <= value {
            low = mid;
        } else {
            high = mid;
        }
    }

    // Halving stalls one step short of exact roots.
    let next = low.saturating_add(Fixed::DELTA);
    if next.saturating_mul(next) <= value {
        next
    } else {
        low
    }
}
