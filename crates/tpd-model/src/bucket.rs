//! Day-bucket partition for result delays.
//!
//! Delays are grouped into seven ordered, non-overlapping bins covering
//! the whole number line: (-inf,1], (1,2], (2,3], (3,4], (4,6], (6,10],
//! (10,inf). Display always uses this fixed order, never the sort order
//! of the underlying data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the seven delay bins, identified by its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DelayBucket {
    UpToOne,
    OneToTwo,
    TwoToThree,
    ThreeToFour,
    FourToSix,
    SixToTen,
    OverTen,
}

impl DelayBucket {
    /// All buckets in display order.
    pub const ALL: [DelayBucket; 7] = [
        DelayBucket::UpToOne,
        DelayBucket::OneToTwo,
        DelayBucket::TwoToThree,
        DelayBucket::ThreeToFour,
        DelayBucket::FourToSix,
        DelayBucket::SixToTen,
        DelayBucket::OverTen,
    ];

    /// Assign a delay (in days) to its bucket.
    ///
    /// Total over finite inputs; each boundary value belongs to the bin it
    /// closes (a delay of exactly 1.0 is `0-1`, exactly 2.0 is `1-2`).
    pub fn from_days(days: f64) -> Self {
        if days <= 1.0 {
            DelayBucket::UpToOne
        } else if days <= 2.0 {
            DelayBucket::OneToTwo
        } else if days <= 3.0 {
            DelayBucket::TwoToThree
        } else if days <= 4.0 {
            DelayBucket::ThreeToFour
        } else if days <= 6.0 {
            DelayBucket::FourToSix
        } else if days <= 10.0 {
            DelayBucket::SixToTen
        } else {
            DelayBucket::OverTen
        }
    }

    /// Display label, matching the chart axis.
    pub fn label(&self) -> &'static str {
        match self {
            DelayBucket::UpToOne => "0-1",
            DelayBucket::OneToTwo => "1-2",
            DelayBucket::TwoToThree => "2-3",
            DelayBucket::ThreeToFour => "3-4",
            DelayBucket::FourToSix => "4-6",
            DelayBucket::SixToTen => "6-10",
            DelayBucket::OverTen => "10+",
        }
    }

    /// Position in display order.
    pub fn index(&self) -> usize {
        match self {
            DelayBucket::UpToOne => 0,
            DelayBucket::OneToTwo => 1,
            DelayBucket::TwoToThree => 2,
            DelayBucket::ThreeToFour => 3,
            DelayBucket::FourToSix => 4,
            DelayBucket::SixToTen => 5,
            DelayBucket::OverTen => 6,
        }
    }

    /// Look a bucket up by its display label.
    pub fn from_label(label: &str) -> Option<Self> {
        DelayBucket::ALL
            .into_iter()
            .find(|bucket| bucket.label() == label)
    }
}

impl fmt::Display for DelayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values_close_their_bin() {
        assert_eq!(DelayBucket::from_days(1.0), DelayBucket::UpToOne);
        assert_eq!(DelayBucket::from_days(2.0), DelayBucket::OneToTwo);
        assert_eq!(DelayBucket::from_days(3.0), DelayBucket::TwoToThree);
        assert_eq!(DelayBucket::from_days(4.0), DelayBucket::ThreeToFour);
        assert_eq!(DelayBucket::from_days(6.0), DelayBucket::FourToSix);
        assert_eq!(DelayBucket::from_days(10.0), DelayBucket::SixToTen);
        assert_eq!(DelayBucket::from_days(10.0001), DelayBucket::OverTen);
    }

    #[test]
    fn negative_delays_land_in_first_bin() {
        assert_eq!(DelayBucket::from_days(-3.5), DelayBucket::UpToOne);
        assert_eq!(DelayBucket::from_days(0.0), DelayBucket::UpToOne);
    }

    #[test]
    fn label_round_trips() {
        for bucket in DelayBucket::ALL {
            assert_eq!(DelayBucket::from_label(bucket.label()), Some(bucket));
        }
        assert_eq!(DelayBucket::from_label("11+"), None);
    }
}
