//! Tests for the bucket partition and status vocabulary.

use tpd_model::{DelayBucket, ObservationStatus, is_culture_code};

use proptest::prelude::*;

#[test]
fn partition_covers_representative_delays() {
    let cases = [
        (-100.0, "0-1"),
        (0.5, "0-1"),
        (1.5, "1-2"),
        (2.5, "2-3"),
        (3.5, "3-4"),
        (5.0, "4-6"),
        (8.0, "6-10"),
        (11.0, "10+"),
        (1000.0, "10+"),
    ];
    for (days, label) in cases {
        assert_eq!(DelayBucket::from_days(days).label(), label, "days={days}");
    }
}

proptest! {
    /// Every finite delay maps to exactly one bucket, and the assignment
    /// respects the bin bounds.
    #[test]
    fn assignment_is_total_and_exclusive(days in -1e6f64..1e6f64) {
        let bucket = DelayBucket::from_days(days);
        let matching: Vec<DelayBucket> = DelayBucket::ALL
            .into_iter()
            .filter(|candidate| *candidate == bucket)
            .collect();
        prop_assert_eq!(matching.len(), 1);

        let (lower, upper): (f64, f64) = match bucket {
            DelayBucket::UpToOne => (f64::NEG_INFINITY, 1.0),
            DelayBucket::OneToTwo => (1.0, 2.0),
            DelayBucket::TwoToThree => (2.0, 3.0),
            DelayBucket::ThreeToFour => (3.0, 4.0),
            DelayBucket::FourToSix => (4.0, 6.0),
            DelayBucket::SixToTen => (6.0, 10.0),
            DelayBucket::OverTen => (10.0, f64::INFINITY),
        };
        prop_assert!(days > lower && days <= upper);
    }

    #[test]
    fn assignment_is_monotone(a in -1e6f64..1e6f64, b in -1e6f64..1e6f64) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            DelayBucket::from_days(small).index() <= DelayBucket::from_days(large).index()
        );
    }
}

#[test]
fn status_vocabulary_round_trips() {
    let statuses = [
        ObservationStatus::Registered,
        ObservationStatus::Preliminary,
        ObservationStatus::Final,
        ObservationStatus::Amended,
        ObservationStatus::Corrected,
        ObservationStatus::Cancelled,
        ObservationStatus::EnteredInError,
    ];
    for status in statuses {
        let parsed: ObservationStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
    }
}

#[test]
fn culture_membership_is_exact() {
    assert!(is_culture_code("600-7"));
    assert!(is_culture_code("43409-2"));
    assert!(!is_culture_code("600-8"));
    assert!(!is_culture_code("43409"));
}
