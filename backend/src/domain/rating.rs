//! Star ratings and the per-parent aggregate derived from them.

use serde::{Deserialize, Serialize};

/// A comment rating on the 1..=5 star scale.
///
/// # Examples
/// ```
/// use torotoro_backend::domain::Rating;
///
/// assert_eq!(Rating::normalize(Some(3.6)).value(), 4);
/// assert_eq!(Rating::normalize(Some(0.0)).value(), 1);
/// assert_eq!(Rating::normalize(Some(-3.0)).value(), 1);
/// assert_eq!(Rating::normalize(Some(7.0)).value(), 5);
/// assert_eq!(Rating::normalize(None).value(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    /// Lowest rating.
    pub const MIN: Self = Self(1);
    /// Highest rating.
    pub const MAX: Self = Self(5);

    /// Coerce an untrusted value onto the star scale.
    ///
    /// The value is rounded half up; anything missing, non-numeric or
    /// rounding to zero counts as the minimum, then the result is clamped
    /// into `1..=5`.
    pub fn normalize(raw: Option<f64>) -> Self {
        let rounded = raw.map_or(0.0, |value| (value + 0.5).floor());
        if rounded.is_nan() || rounded == 0.0 {
            return Self::MIN;
        }
        let clamped = rounded.clamp(f64::from(Self::MIN.0), f64::from(Self::MAX.0));
        // Clamped into 1.0..=5.0, so the cast is exact.
        Self(clamped as u8)
    }

    /// Star count.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Mean and count of the approved ratings under one parent document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAggregate {
    /// Mean rating rounded to two decimals; `0.0` when nothing is approved.
    pub rating_avg: f64,
    /// Number of approved comments.
    pub rating_count: u32,
}

impl RatingAggregate {
    /// Aggregate over the stored ratings of approved comments.
    ///
    /// Non-numeric ratings are counted but contribute zero to the sum.
    ///
    /// # Examples
    /// ```
    /// use torotoro_backend::domain::RatingAggregate;
    ///
    /// let aggregate = RatingAggregate::from_ratings([Some(3.0), Some(4.0), Some(5.0)]);
    /// assert_eq!(aggregate.rating_avg, 4.0);
    /// assert_eq!(aggregate.rating_count, 3);
    /// ```
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0.0_f64, 0_u32), |(sum, count), rating| {
                (sum + rating.unwrap_or(0.0), count.saturating_add(1))
            });

        if count == 0 {
            return Self::empty();
        }

        let mean = sum / f64::from(count);
        Self {
            rating_avg: (mean * 100.0).round() / 100.0,
            rating_count: count,
        }
    }

    /// Aggregate for a parent without approved comments.
    pub const fn empty() -> Self {
        Self {
            rating_avg: 0.0,
            rating_count: 0,
        }
    }
}
